use foundation::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::FeedError;

/// One candidate as serialized by the analysis backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateRecord {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    #[serde(rename = "FOS")]
    pub fos: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub points: Vec<Vec2>,
    pub fos: f64,
}

impl Candidate {
    pub fn new(points: Vec<Vec2>, fos: f64) -> Self {
        Self { points, fos }
    }
}

impl CandidateRecord {
    fn into_candidate(self, index: usize) -> Result<Candidate, FeedError> {
        if self.x.len() != self.y.len() {
            return Err(FeedError::CoordinateMismatch {
                index,
                x_len: self.x.len(),
                y_len: self.y.len(),
            });
        }
        let points = self
            .x
            .into_iter()
            .zip(self.y)
            .map(|(x, y)| Vec2::new(x, y))
            .collect();
        Ok(Candidate::new(points, self.fos))
    }
}

/// Read-only view of the candidate surfaces, ascending by FOS.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CandidateFeed {
    candidates: Vec<Candidate>,
}

impl CandidateFeed {
    /// Accepts the list only if it is already ascending; it is never re-sorted.
    pub fn new(candidates: Vec<Candidate>) -> Result<Self, FeedError> {
        let mut previous: Option<f64> = None;
        for (index, c) in candidates.iter().enumerate() {
            if !c.fos.is_finite() {
                return Err(FeedError::NonFiniteFos { index });
            }
            if let Some(prev) = previous {
                if c.fos < prev {
                    return Err(FeedError::Unsorted {
                        index,
                        previous: prev,
                        fos: c.fos,
                    });
                }
            }
            previous = Some(c.fos);
        }
        Ok(Self { candidates })
    }

    pub fn from_records(records: Vec<CandidateRecord>) -> Result<Self, FeedError> {
        let candidates = records
            .into_iter()
            .enumerate()
            .map(|(i, r)| r.into_candidate(i))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(candidates)
    }

    pub fn from_json_str(s: &str) -> Result<Self, FeedError> {
        let records: Vec<CandidateRecord> = serde_json::from_str(s)?;
        Self::from_records(records)
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Candidates with `from <= fos < below`, ascending. `None` starts at the
    /// most critical one. The feed is sorted, so both ends are binary searches.
    pub fn window(&self, from: Option<f64>, below: f64) -> &[Candidate] {
        let end = self.candidates.partition_point(|c| c.fos < below);
        let start = match from {
            Some(f) => self.candidates[..end].partition_point(|c| c.fos < f),
            None => 0,
        };
        &self.candidates[start..end]
    }
}
