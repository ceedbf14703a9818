//! Two-stage query resolution: class labels first, OCR text second.

use std::cmp::Ordering;

use serde::Deserialize;

use crate::frame::Frame;
use crate::integration::{OcrEngine, text_for};
use crate::tracker::detection::DetectedBox;

/// Configuration for the Matcher.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MatcherConfig {
    /// Highest-confidence boxes sent to OCR when no class label matches.
    pub max_ocr_candidates: usize,
    /// Shortest query token allowed to match OCR text on its own.
    pub min_token_len: usize,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            max_ocr_candidates: 2,
            min_token_len: 3,
        }
    }
}

/// Which stage produced a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchStage {
    Class,
    Text,
}

/// A detection chosen for a query.
#[derive(Debug, Clone, PartialEq)]
pub struct Match<'a> {
    /// Index into the detection slice.
    pub index: usize,
    pub detection: &'a DetectedBox,
    pub stage: MatchStage,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum ClassFit {
    Partial,
    Exact,
}

/// Lowercase, strip punctuation and collapse whitespace.
pub fn normalize(text: &str) -> String {
    let cleaned: String = text
        .chars()
        .map(|c| if c.is_alphanumeric() { c.to_lowercase().next().unwrap_or(c) } else { ' ' })
        .collect();
    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn class_fit(query: &str, label: &str) -> Option<ClassFit> {
    if label.is_empty() {
        return None;
    }
    if query == label {
        return Some(ClassFit::Exact);
    }
    let q: Vec<&str> = query.split(' ').collect();
    let l: Vec<&str> = label.split(' ').collect();
    let query_in_label = q.iter().all(|t| l.contains(t));
    let label_in_query = l.iter().all(|t| q.contains(t));
    (query_in_label || label_in_query).then_some(ClassFit::Partial)
}

/// Resolves a spoken query to one detection in the current frame.
#[derive(Debug, Clone, Default)]
pub struct Matcher {
    config: MatcherConfig,
}

impl Matcher {
    /// Create a matcher with the given configuration.
    pub fn new(config: MatcherConfig) -> Self {
        Self { config }
    }

    /// Resolve `query` against `detections`.
    ///
    /// Stage 2 only runs, and OCR is only requested, when no class label fits.
    pub fn find<'a>(
        &self,
        query: &str,
        detections: &'a [DetectedBox],
        frame: &Frame,
        ocr: &mut dyn OcrEngine,
    ) -> Option<Match<'a>> {
        self.match_class(query, detections)
            .or_else(|| self.match_text(query, detections, frame, ocr))
    }

    /// Stage 1. Exact label beats partial; then confidence, then area.
    pub fn match_class<'a>(&self, query: &str, detections: &'a [DetectedBox]) -> Option<Match<'a>> {
        let query = normalize(query);
        if query.is_empty() {
            return None;
        }

        detections
            .iter()
            .enumerate()
            .filter_map(|(i, d)| class_fit(&query, &normalize(&d.label)).map(|fit| (i, d, fit)))
            .max_by(|a, b| {
                a.2.cmp(&b.2)
                    .then(a.1.confidence.total_cmp(&b.1.confidence))
                    .then(a.1.area().total_cmp(&b.1.area()))
            })
            .map(|(index, detection, _)| Match {
                index,
                detection,
                stage: MatchStage::Class,
            })
    }

    /// Stage 2. Longest matching substring wins; ties go to the larger box.
    pub fn match_text<'a>(
        &self,
        query: &str,
        detections: &'a [DetectedBox],
        frame: &Frame,
        ocr: &mut dyn OcrEngine,
    ) -> Option<Match<'a>> {
        let query = normalize(query);
        if query.is_empty() {
            return None;
        }

        let mut candidates: Vec<(usize, &DetectedBox)> = detections.iter().enumerate().collect();
        candidates.sort_by(|a, b| b.1.confidence.total_cmp(&a.1.confidence));
        candidates.truncate(self.config.max_ocr_candidates);

        let mut best: Option<(usize, &DetectedBox, usize)> = None;
        for (index, detection) in candidates {
            let text = normalize(&text_for(ocr, frame, detection));
            let Some(len) = self.text_match_len(&query, &text) else {
                continue;
            };
            log::debug!("ocr text '{}' on '{}' matches '{}'", text, detection.label, query);

            let better = match best {
                None => true,
                Some((_, current, current_len)) => match len.cmp(&current_len) {
                    Ordering::Greater => true,
                    Ordering::Equal => detection.area() > current.area(),
                    Ordering::Less => false,
                },
            };
            if better {
                best = Some((index, detection, len));
            }
        }

        best.map(|(index, detection, _)| Match {
            index,
            detection,
            stage: MatchStage::Text,
        })
    }

    /// Length of the longest piece of `query` found in `text`.
    fn text_match_len(&self, query: &str, text: &str) -> Option<usize> {
        if text.is_empty() {
            return None;
        }
        if text.contains(query) {
            return Some(query.chars().count());
        }
        query
            .split(' ')
            .filter(|t| t.chars().count() >= self.config.min_token_len)
            .filter(|t| text.contains(t))
            .map(|t| t.chars().count())
            .max()
    }
}
