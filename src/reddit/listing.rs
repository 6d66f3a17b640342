use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::reddit::error::{Error, Stage};

/// A nullable upstream field whose shape is not pinned down.
pub type Untyped = Option<Value>;

/// Reddit occasionally sends `null` for counters and flags; read those as the default.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Listing {
    pub kind: String,
    pub data: ListingData,
}

impl Listing {
    pub fn from_slice(body: &[u8]) -> Result<Self, Error> {
        serde_json::from_slice(body).map_err(|source| Error::Decode {
            stage: Stage::Fetch,
            source,
        })
    }

    pub fn posts(&self) -> impl Iterator<Item = &Post> {
        self.data.children.iter().map(|c| &c.data)
    }

    pub fn len(&self) -> usize {
        self.data.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.children.is_empty()
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ListingData {
    pub modhash: Untyped,
    pub dist: Option<i64>,
    pub children: Vec<Thing>,
    pub after: Option<String>,
    pub before: Option<String>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Thing {
    pub kind: String,
    pub data: Post,
}

/// `false` for untouched posts, otherwise the edit time in epoch seconds.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Edited {
    Flag(bool),
    At(f64),
}

impl Default for Edited {
    fn default() -> Self {
        Edited::Flag(false)
    }
}

impl Edited {
    pub fn is_edited(&self) -> bool {
        !matches!(self, Edited::Flag(false))
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Post {
    pub approved_at_utc: Untyped,
    #[serde(deserialize_with = "null_as_default")]
    pub subreddit: String,
    #[serde(deserialize_with = "null_as_default")]
    pub selftext: String,
    pub author_fullname: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub saved: bool,
    pub mod_reason_title: Untyped,
    #[serde(deserialize_with = "null_as_default")]
    pub gilded: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub clicked: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(deserialize_with = "null_as_default")]
    pub link_flair_richtext: Vec<Value>,
    #[serde(deserialize_with = "null_as_default")]
    pub subreddit_name_prefixed: String,
    #[serde(deserialize_with = "null_as_default")]
    pub hidden: bool,
    pub pwls: Option<i64>,
    pub link_flair_css_class: Untyped,
    #[serde(deserialize_with = "null_as_default")]
    pub downs: i64,
    pub thumbnail_height: Option<i64>,
    pub top_awarded_type: Untyped,
    #[serde(deserialize_with = "null_as_default")]
    pub hide_score: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub quarantine: bool,
    pub link_flair_text_color: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub upvote_ratio: f64,
    pub author_flair_background_color: Untyped,
    #[serde(deserialize_with = "null_as_default")]
    pub subreddit_type: String,
    #[serde(deserialize_with = "null_as_default")]
    pub ups: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub total_awards_received: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub media_embed: Map<String, Value>,
    pub thumbnail_width: Option<i64>,
    pub author_flair_template_id: Untyped,
    #[serde(deserialize_with = "null_as_default")]
    pub is_original_content: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub user_reports: Vec<Value>,
    pub secure_media: Option<Media>,
    #[serde(deserialize_with = "null_as_default")]
    pub is_reddit_media_domain: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub is_meta: bool,
    pub category: Untyped,
    #[serde(deserialize_with = "null_as_default")]
    pub secure_media_embed: Map<String, Value>,
    pub link_flair_text: Untyped,
    #[serde(deserialize_with = "null_as_default")]
    pub can_mod_post: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub score: i64,
    pub approved_by: Untyped,
    #[serde(deserialize_with = "null_as_default")]
    pub author_premium: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub thumbnail: String,
    #[serde(deserialize_with = "null_as_default")]
    pub edited: Edited,
    pub author_flair_css_class: Untyped,
    #[serde(deserialize_with = "null_as_default")]
    pub author_flair_richtext: Vec<Value>,
    #[serde(deserialize_with = "null_as_default")]
    pub gildings: Map<String, Value>,
    pub post_hint: Option<String>,
    pub content_categories: Untyped,
    #[serde(deserialize_with = "null_as_default")]
    pub is_self: bool,
    pub mod_note: Untyped,
    #[serde(deserialize_with = "null_as_default")]
    pub created: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub link_flair_type: String,
    pub wls: Option<i64>,
    pub removed_by_category: Untyped,
    pub banned_by: Untyped,
    pub author_flair_type: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub domain: String,
    #[serde(deserialize_with = "null_as_default")]
    pub allow_live_comments: bool,
    pub selftext_html: Untyped,
    pub likes: Untyped,
    pub suggested_sort: Untyped,
    pub banned_at_utc: Untyped,
    pub url_overridden_by_dest: Option<String>,
    pub view_count: Untyped,
    #[serde(deserialize_with = "null_as_default")]
    pub archived: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub no_follow: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub is_crosspostable: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub pinned: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub over_18: bool,
    pub preview: Option<Preview>,
    #[serde(deserialize_with = "null_as_default")]
    pub all_awardings: Vec<Value>,
    #[serde(deserialize_with = "null_as_default")]
    pub awarders: Vec<Value>,
    #[serde(deserialize_with = "null_as_default")]
    pub media_only: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub can_gild: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub spoiler: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub locked: bool,
    pub author_flair_text: Untyped,
    #[serde(deserialize_with = "null_as_default")]
    pub treatment_tags: Vec<Value>,
    #[serde(deserialize_with = "null_as_default")]
    pub visited: bool,
    pub removed_by: Untyped,
    pub num_reports: Untyped,
    pub distinguished: Untyped,
    #[serde(deserialize_with = "null_as_default")]
    pub subreddit_id: String,
    pub mod_reason_by: Untyped,
    pub removal_reason: Untyped,
    pub link_flair_background_color: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub is_robot_indexable: bool,
    pub report_reasons: Untyped,
    #[serde(deserialize_with = "null_as_default")]
    pub author: String,
    pub discussion_type: Untyped,
    #[serde(deserialize_with = "null_as_default")]
    pub num_comments: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub send_replies: bool,
    pub whitelist_status: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub contest_mode: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub mod_reports: Vec<Value>,
    pub author_patreon_flair: Option<bool>,
    pub author_flair_text_color: Untyped,
    #[serde(deserialize_with = "null_as_default")]
    pub permalink: String,
    pub parent_whitelist_status: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub stickied: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub url: String,
    #[serde(deserialize_with = "null_as_default")]
    pub subreddit_subscribers: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub created_utc: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub num_crossposts: i64,
    pub media: Option<Media>,
    #[serde(deserialize_with = "null_as_default")]
    pub is_video: bool,
}

impl Post {
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        let secs = self.created_utc.trunc() as i64;
        let nanos = (self.created_utc.fract() * 1e9) as u32;
        Utc.timestamp_opt(secs, nanos).single()
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Media {
    pub reddit_video: Option<RedditVideo>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RedditVideo {
    pub bitrate_kbps: i64,
    pub fallback_url: String,
    pub height: i64,
    pub width: i64,
    pub scrubber_media_url: String,
    pub dash_url: String,
    pub duration: i64,
    pub hls_url: String,
    pub is_gif: bool,
    pub transcoding_status: String,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Preview {
    pub images: Vec<PreviewImage>,
    pub enabled: bool,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PreviewImage {
    pub source: ImageSource,
    pub resolutions: Vec<ImageSource>,
    pub variants: Map<String, Value>,
    pub id: String,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageSource {
    pub url: String,
    pub width: i64,
    pub height: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn post(id: &str, edited: Value) -> Value {
        json!({
            "kind": "t3",
            "data": {
                "id": id,
                "name": format!("t3_{id}"),
                "title": "Explosions in the Sky - The Earth Is Not a Cold Dead Place",
                "author": "someone",
                "subreddit": "postrock",
                "subreddit_name_prefixed": "r/postrock",
                "edited": edited,
                "created_utc": 1686787200.0,
                "approved_at_utc": null,
                "media": null,
                "thumbnail_height": null,
                "some_future_field": {"nested": [1, 2, 3]}
            }
        })
    }

    fn listing(children: Vec<Value>) -> Vec<u8> {
        serde_json::to_vec(&json!({
            "kind": "Listing",
            "data": {
                "after": "t3_abc",
                "dist": children.len(),
                "modhash": "",
                "children": children,
                "before": null
            }
        }))
        .unwrap()
    }

    #[test]
    fn decodes_children() {
        let body = listing(vec![post("a", json!(false)), post("b", json!(1686790000.5)), post("c", json!(true))]);
        let listing = Listing::from_slice(&body).unwrap();
        assert_eq!(listing.kind, "Listing");
        assert_eq!(listing.len(), 3);
        assert_eq!(listing.data.after.as_deref(), Some("t3_abc"));
        assert_eq!(listing.data.before, None);

        let posts: Vec<&Post> = listing.posts().collect();
        assert_eq!(posts[0].id, "a");
        assert!(!posts[0].edited.is_edited());
        assert_eq!(posts[1].edited, Edited::At(1686790000.5));
        assert!(posts[2].edited.is_edited());
        assert!(posts[0].approved_at_utc.is_none());
        assert!(posts[0].media.is_none());
    }

    #[test]
    fn zero_children_is_empty_listing() {
        let listing = Listing::from_slice(&listing(vec![])).unwrap();
        assert!(listing.is_empty());
        assert_eq!(listing.data.children.len(), 0);
    }

    #[test]
    fn malformed_json_is_decode_error() {
        let err = Listing::from_slice(b"{\"kind\": \"Listing\", \"data\": {").unwrap_err();
        assert!(matches!(err, Error::Decode { stage: Stage::Fetch, .. }));

        let err = Listing::from_slice(br#"{"data": {"children": "nope"}}"#).unwrap_err();
        assert!(matches!(err, Error::Decode { .. }));
    }

    #[test]
    fn null_counters_read_as_defaults() {
        let body = listing(vec![json!({
            "kind": "t3",
            "data": {
                "id": "n1",
                "title": null,
                "score": null,
                "num_comments": null,
                "upvote_ratio": null,
                "edited": null,
                "stickied": null,
                "all_awardings": null,
                "gildings": null
            }
        })]);
        let listing = Listing::from_slice(&body).unwrap();
        let post = listing.posts().next().unwrap();
        assert_eq!(post.id, "n1");
        assert_eq!(post.title, "");
        assert_eq!(post.score, 0);
        assert_eq!(post.num_comments, 0);
        assert_eq!(post.upvote_ratio, 0.0);
        assert_eq!(post.edited, Edited::Flag(false));
        assert!(!post.stickied);
        assert!(post.all_awardings.is_empty());
        assert!(post.gildings.is_empty());
    }

    #[test]
    fn wrong_type_is_still_decode_error() {
        let body = listing(vec![json!({"kind": "t3", "data": {"score": "lots"}})]);
        assert!(matches!(Listing::from_slice(&body), Err(Error::Decode { .. })));
    }

    #[test]
    fn created_at_from_epoch() {
        let listing = Listing::from_slice(&listing(vec![post("a", json!(false))])).unwrap();
        let created = listing.posts().next().unwrap().created_at().unwrap();
        assert_eq!(created.to_rfc3339(), "2023-06-15T00:00:00+00:00");
    }
}
