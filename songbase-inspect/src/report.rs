//! Library reports: song listings, album buckets, likely duplicates

use serde::Serialize;
use songbase_common::song::{AlbumKey, SimilarityKey};
use songbase_common::Song;
use std::collections::{BTreeMap, HashMap};

/// One line of a song listing
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SongSummary {
    pub id: Option<i64>,
    pub title: String,
    pub artist: String,
    pub album: String,
    pub length: Option<String>,
    pub year: Option<i32>,
    pub filetype: String,
    pub url: String,
    pub playcount: u32,
}

impl From<&Song> for SongSummary {
    fn from(song: &Song) -> Self {
        Self {
            id: song.id(),
            title: song.pretty_title(),
            artist: song.artist().to_string(),
            album: song.effective_album().to_string(),
            length: song.pretty_length(),
            year: song.year(),
            filetype: song.filetype().description().to_string(),
            url: song.url().to_string(),
            playcount: song.playcount(),
        }
    }
}

impl std::fmt::Display for SongSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let id = self.id.map(|id| id.to_string()).unwrap_or_else(|| "-".into());
        let length = self.length.as_deref().unwrap_or("?:??");
        if self.artist.is_empty() {
            write!(f, "{:>6}  {:>8}  {}", id, length, self.title)?;
        } else {
            write!(f, "{:>6}  {:>8}  {} - {}", id, length, self.artist, self.title)?;
        }
        if !self.album.is_empty() {
            write!(f, " [{}]", self.album)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlbumSummary {
    pub key: String,
    pub albumartist: String,
    pub album: String,
    pub compilation: bool,
    pub songs: usize,
}

/// Bucket songs by album key, in key order
pub fn group_albums(songs: &[Song]) -> Vec<AlbumSummary> {
    let mut albums: BTreeMap<AlbumKey, Vec<&Song>> = BTreeMap::new();
    for song in songs {
        albums.entry(song.album_key()).or_default().push(song);
    }

    albums
        .into_iter()
        .map(|(key, members)| {
            let first = members[0];
            AlbumSummary {
                key: key.to_string(),
                albumartist: if first.is_compilation() {
                    "Various artists".to_string()
                } else {
                    first.effective_albumartist().to_string()
                },
                album: first.effective_album().to_string(),
                compilation: first.is_compilation(),
                songs: members.len(),
            }
        })
        .collect()
}

/// Groups of two or more songs with the same title and artist, ignoring case
pub fn find_duplicates(songs: &[Song]) -> Vec<Vec<SongSummary>> {
    let mut order: Vec<SimilarityKey> = Vec::new();
    let mut groups: HashMap<SimilarityKey, Vec<&Song>> = HashMap::new();
    for song in songs {
        let key = song.similarity_key();
        if !groups.contains_key(&key) {
            order.push(key.clone());
        }
        groups.entry(key).or_default().push(song);
    }

    order
        .into_iter()
        .filter_map(|key| groups.remove(&key))
        .filter(|group| group.len() > 1)
        .map(|group| group.into_iter().map(SongSummary::from).collect())
        .collect()
}
