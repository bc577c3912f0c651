use std::fmt;

use serde::{
    de::{MapAccess, Visitor},
    Deserialize, Deserializer, Serialize, Serializer,
};

use crate::{
    domain::{TaskId, ViewKind},
    error::{ClientError, ServiceFailure},
};

/// Numeric font size in pixels, rendered without a trailing `.0` when integral.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FontSize(pub f64);

impl fmt::Display for FontSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = self.0;
        if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
            write!(f, "{}", value as i64)
        } else {
            write!(f, "{value}")
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DistributionBucket {
    pub size: FontSize,
    pub count: u64,
}

/// Font size -> occurrence count, kept in the order the service sent it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FontSizeDistribution {
    buckets: Vec<DistributionBucket>,
}

impl FontSizeDistribution {
    pub fn buckets(&self) -> &[DistributionBucket] {
        &self.buckets
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn total_count(&self) -> u64 {
        self.buckets.iter().map(|bucket| bucket.count).sum()
    }

    fn insert_unique(&mut self, size: FontSize, count: u64) -> Result<(), String> {
        if self.buckets.iter().any(|bucket| bucket.size == size) {
            return Err(format!("duplicate font size bucket {size}"));
        }
        self.buckets.push(DistributionBucket { size, count });
        Ok(())
    }
}

impl FromIterator<(f64, u64)> for FontSizeDistribution {
    fn from_iter<T: IntoIterator<Item = (f64, u64)>>(iter: T) -> Self {
        let mut distribution = Self::default();
        for (size, count) in iter {
            match distribution
                .buckets
                .iter_mut()
                .find(|bucket| bucket.size.0 == size)
            {
                Some(bucket) => bucket.count = count,
                None => distribution.buckets.push(DistributionBucket {
                    size: FontSize(size),
                    count,
                }),
            }
        }
        distribution
    }
}

impl Serialize for FontSizeDistribution {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(
            self.buckets
                .iter()
                .map(|bucket| (bucket.size.to_string(), bucket.count)),
        )
    }
}

impl<'de> Deserialize<'de> for FontSizeDistribution {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct DistributionVisitor;

        impl<'de> Visitor<'de> for DistributionVisitor {
            type Value = FontSizeDistribution;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map from numeric font size to occurrence count")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut distribution = FontSizeDistribution::default();
                while let Some((key, count)) = map.next_entry::<String, u64>()? {
                    let size = key.trim().parse::<f64>().map_err(|_| {
                        serde::de::Error::custom(format!("font size key '{key}' is not numeric"))
                    })?;
                    distribution
                        .insert_unique(FontSize(size), count)
                        .map_err(serde::de::Error::custom)?;
                }
                Ok(distribution)
            }
        }

        deserializer.deserialize_map(DistributionVisitor)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Report {
    #[serde(default)]
    pub total_texts: u64,
    #[serde(default)]
    pub fitted_texts: u64,
    #[serde(default)]
    pub unique_font_sizes: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub average_font_size: Option<FontSize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub most_common_size: Option<FontSize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_font_size: Option<FontSize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_font_size: Option<FontSize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size_distribution: Option<FontSizeDistribution>,
}

/// Service-relative artifact paths, one per view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImagePaths {
    pub normalized: String,
    pub ocr_detection: String,
    pub overlay: String,
    pub annotated: String,
}

impl ImagePaths {
    pub fn get(&self, view: ViewKind) -> &str {
        match view {
            ViewKind::Normalized => &self.normalized,
            ViewKind::OcrDetection => &self.ocr_detection,
            ViewKind::Overlay => &self.overlay,
            ViewKind::Annotated => &self.annotated,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_id: Option<TaskId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub report: Option<Report>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub images: Option<ImagePaths>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_type: Option<String>,
}

/// A confirmed-successful analysis run.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessOutcome {
    pub task_id: Option<TaskId>,
    pub report: Report,
    pub images: ImagePaths,
}

impl ProcessResponse {
    pub fn into_outcome(self) -> Result<ProcessOutcome, ClientError> {
        if !self.success {
            return Err(ServiceFailure {
                error: self.error,
                error_type: self.error_type,
            }
            .into());
        }
        let report = self
            .report
            .ok_or_else(|| ClientError::Decode("success response is missing 'report'".into()))?;
        let images = self
            .images
            .ok_or_else(|| ClientError::Decode("success response is missing 'images'".into()))?;
        Ok(ProcessOutcome {
            task_id: self.task_id,
            report,
            images,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    #[serde(default)]
    pub service: String,
    #[serde(default)]
    pub version: String,
}

/// Persisted result document served by `GET /api/result/{task_id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredResult {
    pub task_id: TaskId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    pub report: Report,
}

#[cfg(test)]
#[path = "tests/protocol_tests.rs"]
mod tests;
