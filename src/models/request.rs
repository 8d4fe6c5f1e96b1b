use garde::Validate;
use serde::{Deserialize, Serialize};

/// A batch of store visits submitted for image analysis.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct JobRequest {
    /// Declared number of visits; must equal `visits.len()`.
    #[garde(custom(matches_visit_count(self.visits.len())))]
    pub count: usize,

    #[garde(skip)]
    pub visits: Vec<Visit>,
}

/// One store's images. `visit_time` is opaque and carried through as-is.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Visit {
    pub store_id: String,
    #[serde(rename = "image_url")]
    pub image_urls: Vec<String>,
    pub visit_time: String,
}

impl JobRequest {
    /// Total number of image references across all visits.
    pub fn image_count(&self) -> usize {
        self.visits.iter().map(|v| v.image_urls.len()).sum()
    }
}

fn matches_visit_count(actual: usize) -> impl FnOnce(&usize, &()) -> garde::Result {
    move |declared, _| {
        if *declared != actual {
            return Err(garde::Error::new(format!(
                "count {declared} does not match {actual} visits"
            )));
        }
        Ok(())
    }
}
