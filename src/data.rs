use serde::{Deserialize, Serialize};

pub use crate::types::{ClassifierTag, DecoderTag, RevisionTag};

/// One scored experiment cell: a revision/classifier/decoder combination
/// and the F1 it achieved.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RunRecord {
    /// Revision tag for the run that produced this score.
    pub revision: RevisionTag,
    /// Classifier used for the run.
    pub classifier: ClassifierTag,
    /// Decoder used for the run.
    pub decoder: DecoderTag,
    /// F1 score, conventionally in [0, 1] (not enforced on intake).
    pub f1: f64,
}

impl RunRecord {
    /// Build a record from tag values and a score.
    pub fn new(
        revision: impl Into<RevisionTag>,
        classifier: impl Into<ClassifierTag>,
        decoder: impl Into<DecoderTag>,
        f1: f64,
    ) -> Self {
        Self {
            revision: revision.into(),
            classifier: classifier.into(),
            decoder: decoder.into(),
            f1,
        }
    }

    /// Value-level schema check for use with
    /// [`crate::RecordStore::load_checked`]: the score must be finite
    /// and every tag non-empty.
    pub fn validate(&self) -> Result<(), String> {
        if !self.f1.is_finite() {
            return Err(format!("non-finite f1 score {}", self.f1));
        }
        if self.revision.is_empty() || self.classifier.is_empty() || self.decoder.is_empty() {
            return Err("empty tag field".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_accepts_a_plain_record() {
        let record = RunRecord::new("r1", "maxent", "mst", 0.379);
        assert_eq!(record.validate(), Ok(()));
    }

    #[test]
    fn validate_rejects_non_finite_scores() {
        let record = RunRecord::new("r1", "maxent", "mst", f64::NAN);
        assert!(record.validate().is_err());
        let record = RunRecord::new("r1", "maxent", "mst", f64::INFINITY);
        assert!(record.validate().is_err());
    }

    #[test]
    fn validate_rejects_empty_tags() {
        let record = RunRecord::new("", "maxent", "mst", 0.3);
        assert!(record.validate().is_err());
        let record = RunRecord::new("r1", "maxent", "", 0.3);
        assert!(record.validate().is_err());
    }

    #[test]
    fn records_round_trip_through_json() {
        let record = RunRecord::new("r2", "bayes", "local", 0.385);
        let json = serde_json::to_string(&record).expect("serialize");
        let back: RunRecord = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, record);
    }
}
