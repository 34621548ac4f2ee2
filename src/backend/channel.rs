//! Channel-name resolution.
//!
//! The archive identifies channels by backend-specific query tags, while the
//! DVR adapters report human-readable channel names. A user-configurable
//! mapping resolves names to query lists; unmapped names fall back to a
//! normalized form of the name itself.

use std::collections::HashMap;

/// User-configurable channel-name to query-list mapping.
#[derive(Debug, Clone, Default)]
pub struct ChannelQueryMap {
    entries: HashMap<String, Vec<String>>,
}

impl ChannelQueryMap {
    /// Create an empty mapping.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the queries to use for a channel name. Replaces any prior
    /// entry for the same name.
    pub fn insert(&mut self, channel: impl Into<String>, queries: Vec<String>) {
        self.entries.insert(channel.into(), queries);
    }

    /// Resolve a channel name to its backend queries.
    ///
    /// Falls back to the normalized channel name when unmapped.
    #[must_use]
    pub fn queries_for(&self, channel: &str) -> Vec<String> {
        self.entries
            .get(channel)
            .cloned()
            .unwrap_or_else(|| vec![normalize_channel_name(channel)])
    }
}

/// Sub-channel suffixes some DVR backends append to the base channel name.
const STRIPPED_SUFFIXES: &[&str] = &["・サブ", "サブ", "臨時"];

/// Normalize a channel name for use as a fallback query: full-width
/// alphanumerics folded to ASCII, lowercased, whitespace removed, known
/// sub-channel suffixes stripped.
#[must_use]
pub fn normalize_channel_name(name: &str) -> String {
    let mut folded: String = name
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| match c {
            '\u{ff01}'..='\u{ff5e}' => {
                char::from_u32(c as u32 - 0xfee0).unwrap_or(c)
            }
            _ => c,
        })
        .flat_map(char::to_lowercase)
        .collect();
    loop {
        let Some(suffix) = STRIPPED_SUFFIXES
            .iter()
            .find(|suffix| folded.ends_with(*suffix))
        else {
            break;
        };
        folded.truncate(folded.len() - suffix.len());
    }
    folded
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn mapped_channel_uses_configured_queries() {
        let mut map = ChannelQueryMap::new();
        map.insert("NHK総合", vec!["jk1".to_owned()]);
        assert_eq!(map.queries_for("NHK総合"), vec!["jk1".to_owned()]);
    }

    #[test]
    fn unmapped_channel_falls_back_to_normalized_name() {
        let map = ChannelQueryMap::new();
        assert_eq!(map.queries_for("ＢＳ１１"), vec!["bs11".to_owned()]);
    }

    #[test]
    fn normalization_folds_width_case_and_whitespace() {
        assert_eq!(normalize_channel_name("ＴＯＫＹＯ ＭＸ"), "tokyomx");
        assert_eq!(normalize_channel_name("Abc 1"), "abc1");
    }

    #[test]
    fn normalization_strips_sub_channel_suffixes() {
        assert_eq!(normalize_channel_name("NHK総合・サブ"), "nhk総合");
        assert_eq!(normalize_channel_name("NHK総合サブ"), "nhk総合");
    }
}
