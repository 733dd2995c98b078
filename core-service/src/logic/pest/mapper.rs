//! Category Mapping
//!
//! Class id + confidence to `CategoryBucket`. Kept behind a trait so a
//! domain-trained classifier can bring its own label mapping.

use std::ops::RangeInclusive;

use super::rules::{DISEASE_OR_PLANT_CLASS_IDS, INSECT_CLASS_IDS, UNCERTAIN_CONFIDENCE};
use super::types::CategoryBucket;

pub trait CategoryMapper: Send + Sync {
    fn bucket(&self, class_id: usize, confidence: f32) -> CategoryBucket;
}

/// Range mapping for the ImageNet-1k label space
#[derive(Debug, Clone)]
pub struct ImageNetRanges {
    pub insect: RangeInclusive<usize>,
    pub disease_or_plant: RangeInclusive<usize>,
    pub uncertain_below: f32,
}

impl Default for ImageNetRanges {
    fn default() -> Self {
        Self {
            insect: INSECT_CLASS_IDS,
            disease_or_plant: DISEASE_OR_PLANT_CLASS_IDS,
            uncertain_below: UNCERTAIN_CONFIDENCE,
        }
    }
}

impl CategoryMapper for ImageNetRanges {
    fn bucket(&self, class_id: usize, confidence: f32) -> CategoryBucket {
        // Range membership wins over confidence
        if self.insect.contains(&class_id) {
            CategoryBucket::Insect
        } else if self.disease_or_plant.contains(&class_id) {
            CategoryBucket::DiseaseOrPlant
        } else if confidence < self.uncertain_below {
            CategoryBucket::Uncertain
        } else {
            CategoryBucket::Other
        }
    }
}

/// Bucket under the default ImageNet ranges
pub fn bucket_for(class_id: usize, confidence: f32) -> CategoryBucket {
    ImageNetRanges::default().bucket(class_id, confidence)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insect_range_ignores_confidence() {
        assert_eq!(bucket_for(350, 0.05), CategoryBucket::Insect);
        assert_eq!(bucket_for(350, 0.99), CategoryBucket::Insect);
        assert_eq!(bucket_for(300, 0.5), CategoryBucket::Insect);
        assert_eq!(bucket_for(399, 0.5), CategoryBucket::Insect);
    }

    #[test]
    fn test_disease_or_plant_range() {
        assert_eq!(bucket_for(990, 0.9), CategoryBucket::DiseaseOrPlant);
        assert_eq!(bucket_for(980, 0.1), CategoryBucket::DiseaseOrPlant);
        assert_eq!(bucket_for(999, 0.5), CategoryBucket::DiseaseOrPlant);
    }

    #[test]
    fn test_uncertain_and_other() {
        assert_eq!(bucket_for(500, 0.2), CategoryBucket::Uncertain);
        assert_eq!(bucket_for(500, 0.9), CategoryBucket::Other);
        assert_eq!(bucket_for(299, 0.39), CategoryBucket::Uncertain);
        assert_eq!(bucket_for(400, 0.40), CategoryBucket::Other);
        assert_eq!(bucket_for(979, 0.41), CategoryBucket::Other);
    }

    #[test]
    fn test_custom_ranges() {
        let mapper = ImageNetRanges {
            insect: 0..=9,
            disease_or_plant: 10..=19,
            uncertain_below: 0.5,
        };
        assert_eq!(mapper.bucket(5, 0.1), CategoryBucket::Insect);
        assert_eq!(mapper.bucket(15, 0.1), CategoryBucket::DiseaseOrPlant);
        assert_eq!(mapper.bucket(350, 0.45), CategoryBucket::Uncertain);
    }
}
