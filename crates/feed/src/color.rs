use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::FeedError;

/// Color ladder anchors used by [`FosColorTable::default_ladder`].
const LADDER_ANCHORS: [(i64, [u8; 3]); 6] = [
    (0, [0xff, 0x00, 0x00]),  // red
    (10, [0xff, 0xa5, 0x00]), // orange
    (20, [0x00, 0x80, 0x00]), // green
    (30, [0x0c, 0x84, 0xa8]),
    (40, [0x0c, 0x1e, 0xa8]),
    (50, [0x80, 0x00, 0x80]), // purple
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LegendRow {
    pub key: String,
    pub color: String,
}

/// FOS bucket -> display color. Buckets are tenths; the largest one saturates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FosColorTable {
    // Keyed by FOS in tenths so numeric and map order agree ("10.0" > "9.0").
    entries: BTreeMap<i64, String>,
}

impl FosColorTable {
    pub fn from_entries<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Result<Self, FeedError>
    where
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut map = BTreeMap::new();
        for (key, color) in entries {
            let key = key.as_ref();
            map.insert(parse_key(key)?, color.into());
        }
        if map.is_empty() {
            return Err(FeedError::EmptyColorTable);
        }
        Ok(Self { entries: map })
    }

    pub fn from_json_str(s: &str) -> Result<Self, FeedError> {
        let raw: BTreeMap<String, String> = serde_json::from_str(s)?;
        Self::from_entries(raw)
    }

    /// The 0.0 to 5.0 ladder, interpolated between fixed anchor colors.
    pub fn default_ladder() -> Self {
        let mut entries = BTreeMap::new();
        for pair in LADDER_ANCHORS.windows(2) {
            let (t0, c0) = pair[0];
            let (t1, c1) = pair[1];
            for tenths in t0..=t1 {
                let t = (tenths - t0) as f64 / (t1 - t0) as f64;
                entries.insert(tenths, hex(mix(c0, c1, t)));
            }
        }
        Self { entries }
    }

    /// Largest key; FOS values above it share its color.
    pub fn ceiling_key(&self) -> String {
        format_key(self.ceiling_tenths())
    }

    fn ceiling_tenths(&self) -> i64 {
        self.entries.keys().next_back().copied().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `min(round(fos, 1), ceiling)` written with exactly one decimal digit.
    pub fn bucket_key(&self, fos: f64) -> String {
        if !fos.is_finite() {
            return fos.to_string();
        }
        format_key(bucket_tenths(fos).min(self.ceiling_tenths()))
    }

    pub fn bucket_color(&self, fos: f64) -> Result<&str, FeedError> {
        let key = self.bucket_key(fos);
        let found = if fos.is_finite() {
            self.entries
                .get(&bucket_tenths(fos).min(self.ceiling_tenths()))
        } else {
            None
        };
        found
            .map(|s| s.as_str())
            .ok_or(FeedError::UnknownBucket { key })
    }

    /// Rows for a tabular FOS scale, ascending.
    pub fn legend(&self) -> Vec<LegendRow> {
        self.entries
            .iter()
            .map(|(tenths, color)| LegendRow {
                key: format_key(*tenths),
                color: color.clone(),
            })
            .collect()
    }
}

impl Default for FosColorTable {
    fn default() -> Self {
        Self::default_ladder()
    }
}

fn bucket_tenths(fos: f64) -> i64 {
    (fos * 10.0).round() as i64
}

fn format_key(tenths: i64) -> String {
    let sign = if tenths < 0 { "-" } else { "" };
    let abs = tenths.unsigned_abs();
    format!("{sign}{}.{}", abs / 10, abs % 10)
}

fn parse_key(key: &str) -> Result<i64, FeedError> {
    let bad = || FeedError::BadBucketKey {
        key: key.to_string(),
    };
    let value: f64 = key.trim().parse().map_err(|_| bad())?;
    if !value.is_finite() {
        return Err(bad());
    }
    let tenths = bucket_tenths(value);
    if format_key(tenths) != key.trim() {
        return Err(bad());
    }
    Ok(tenths)
}

fn mix(a: [u8; 3], b: [u8; 3], t: f64) -> [u8; 3] {
    let channel = |i: usize| (a[i] as f64 + (b[i] as f64 - a[i] as f64) * t).round() as u8;
    [channel(0), channel(1), channel(2)]
}

fn hex(c: [u8; 3]) -> String {
    format!("#{:02x}{:02x}{:02x}", c[0], c[1], c[2])
}
