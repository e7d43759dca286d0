//! Music-streaming account data, fetched with a bearer token.
//!
//! Obtaining the token is handled by [`crate::auth`].

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::config::settings::MusicConfig;
use crate::error::{CoreError, CoreResult};
use crate::http::{fetch_json, HttpClient, HttpRequest};
use crate::providers::describe_with;

const ITEM_LIMIT: u32 = 10;
const FETCH_FAILED: &str = "Failed to fetch Spotify data";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Track {
    pub id: String,
    pub name: String,
    pub artists: Vec<String>,
    pub album: String,
    pub image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Playlist {
    pub id: String,
    pub name: String,
    pub image: Option<String>,
    pub track_count: u64,
}

/// Everything the music widget shows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MusicLibrary {
    pub top_tracks: Vec<Track>,
    pub recent_tracks: Vec<Track>,
    pub playlists: Vec<Playlist>,
}

#[derive(Deserialize)]
struct Page<T> {
    #[serde(default = "Vec::new")]
    items: Vec<T>,
}

#[derive(Deserialize)]
struct RawTrack {
    #[serde(default)]
    id: String,
    name: String,
    #[serde(default)]
    artists: Vec<Named>,
    album: RawAlbum,
}

#[derive(Deserialize)]
struct RawAlbum {
    name: String,
    #[serde(default)]
    images: Vec<Image>,
}

#[derive(Deserialize)]
struct RawPlayed {
    track: RawTrack,
}

#[derive(Deserialize)]
struct RawPlaylist {
    id: String,
    name: String,
    #[serde(default)]
    images: Option<Vec<Image>>,
    tracks: TrackTotal,
}

#[derive(Deserialize)]
struct Named {
    name: String,
}

#[derive(Deserialize)]
struct Image {
    url: String,
}

#[derive(Deserialize)]
struct TrackTotal {
    #[serde(default)]
    total: u64,
}

impl From<RawTrack> for Track {
    fn from(raw: RawTrack) -> Self {
        Self {
            id: raw.id,
            name: raw.name,
            artists: raw.artists.into_iter().map(|a| a.name).collect(),
            album: raw.album.name,
            image: raw.album.images.into_iter().next().map(|i| i.url),
        }
    }
}

impl From<RawPlaylist> for Playlist {
    fn from(raw: RawPlaylist) -> Self {
        Self {
            id: raw.id,
            name: raw.name,
            image: raw
                .images
                .and_then(|images| images.into_iter().next())
                .map(|i| i.url),
            track_count: raw.tracks.total,
        }
    }
}

pub struct MusicProvider {
    client: Arc<dyn HttpClient>,
    config: MusicConfig,
}

impl MusicProvider {
    pub fn new(client: Arc<dyn HttpClient>, config: MusicConfig) -> Self {
        Self { client, config }
    }

    fn request(&self, path: &str, token: &str) -> HttpRequest {
        HttpRequest::get(format!("{}/{path}", self.config.api_base_url))
            .query("limit", ITEM_LIMIT)
            .bearer(token)
    }

    /// Top tracks, recently played tracks and playlists, fetched
    /// concurrently.
    ///
    /// # Errors
    ///
    /// [`CoreError::Unauthorized`] if the provider rejects `token`; the
    /// caller should forget the token and offer a login.
    pub async fn library(&self, token: &str) -> CoreResult<MusicLibrary> {
        let client = self.client.as_ref();
        let result = tokio::try_join!(
            fetch_json::<Page<RawTrack>>(client, self.request("me/top/tracks", token)),
            fetch_json::<Page<RawPlayed>>(client, self.request("me/player/recently-played", token)),
            fetch_json::<Page<RawPlaylist>>(client, self.request("me/playlists", token)),
        );
        let (top, recent, playlists) = result.map_err(|e| match e {
            CoreError::Http { status: 401, .. } => CoreError::Unauthorized,
            other => other,
        })?;
        Ok(MusicLibrary {
            top_tracks: top.items.into_iter().map(Track::from).collect(),
            recent_tracks: recent
                .items
                .into_iter()
                .map(|played| Track::from(played.track))
                .collect(),
            playlists: playlists.items.into_iter().map(Playlist::from).collect(),
        })
    }

    pub fn describe_failure(err: &CoreError) -> String {
        describe_with(err, FETCH_FAILED)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::StubClient;

    const TRACK: &str = r#"{"id": "t1", "name": "Song", "artists": [{"name": "A"}, {"name": "B"}], "album": {"name": "LP", "images": [{"url": "https://img/1"}, {"url": "https://img/2"}]}}"#;

    fn stub() -> StubClient {
        StubClient::new()
            .ok("me/top/tracks", format!(r#"{{"items": [{TRACK}]}}"#))
            .ok(
                "me/player/recently-played",
                format!(r#"{{"items": [{{"track": {TRACK}, "played_at": "2024-05-01T00:00:00Z"}}]}}"#),
            )
            .ok(
                "me/playlists",
                r#"{"items": [{"id": "p1", "name": "Mix", "images": null, "tracks": {"total": 42}}]}"#,
            )
    }

    #[tokio::test]
    async fn library_maps_all_three_lists() {
        let stub = Arc::new(stub());
        let music = MusicProvider::new(stub.clone(), MusicConfig::default());
        let lib = music.library("tok").await.unwrap();

        let expected = Track {
            id: "t1".to_string(),
            name: "Song".to_string(),
            artists: vec!["A".to_string(), "B".to_string()],
            album: "LP".to_string(),
            image: Some("https://img/1".to_string()),
        };
        assert_eq!(lib.top_tracks, vec![expected.clone()]);
        assert_eq!(lib.recent_tracks, vec![expected]);
        assert_eq!(lib.playlists[0].track_count, 42);
        assert_eq!(lib.playlists[0].image, None);

        let requests = stub.requests();
        assert_eq!(requests.len(), 3);
        assert!(requests.iter().all(|r| r.bearer.as_deref() == Some("tok")));
        assert!(requests.iter().all(|r| r.query_value("limit") == Some("10")));
    }

    #[tokio::test]
    async fn rejected_token_is_unauthorized() {
        let stub = stub().route("me/playlists", 401, "{}").into_shared();
        let err = MusicProvider::new(stub, MusicConfig::default())
            .library("expired")
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::Unauthorized));
    }

    #[tokio::test]
    async fn other_failures_use_generic_message() {
        let stub = stub().route("me/top/tracks", 503, "{}").into_shared();
        let err = MusicProvider::new(stub, MusicConfig::default())
            .library("tok")
            .await
            .unwrap_err();
        assert_eq!(MusicProvider::describe_failure(&err), FETCH_FAILED);
    }
}
