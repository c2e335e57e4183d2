use serde::{Deserialize, Serialize};

use super::domain::AffinityProfile;

/// Learning stream reference data from the streams collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamRecommendation {
    pub stream_name: String,
    pub category: String,
    pub description: String,
    pub difficulty_level: String,
    pub resource_type: String,
    pub duration: String,
    pub url: Option<String>,
    pub platform: String,
}

/// A recommended stream tagged with the career field that drove it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedStream {
    #[serde(flatten)]
    pub stream: StreamRecommendation,
    pub match_score: f64,
    pub career_field: String,
}

pub const DEFAULT_RECOMMENDATION_CAP: usize = 5;

const TOP_FIELD_COUNT: usize = 3;

/// Static career-field to stream-category table. Fields without a mapping
/// fall through as their own category.
pub fn stream_category(field: &str) -> &str {
    match field {
        "Technology" => "Technology",
        "Science" => "Science",
        "Business" => "Business",
        "Social Services" => "Social Sciences",
        "Healthcare" => "Science",
        "Creative Arts" => "Arts",
        "Education" => "Social Sciences",
        "Engineering" => "Technology",
        other => other,
    }
}

/// Collects stream suggestions for the top-ranked career fields.
///
/// Fields are visited in rank order, so a higher-ranked field's streams can
/// crowd out lower-ranked ones once the cap is reached.
pub fn rank_streams(
    profile: &AffinityProfile,
    streams: &[StreamRecommendation],
    cap: usize,
) -> Vec<RankedStream> {
    let mut ranked = Vec::new();

    for field in profile.top(TOP_FIELD_COUNT) {
        let category = stream_category(&field.field);
        for stream in streams.iter().filter(|s| s.category == category) {
            if ranked.len() >= cap {
                return ranked;
            }
            ranked.push(RankedStream {
                stream: stream.clone(),
                match_score: field.average(),
                career_field: field.field.clone(),
            });
        }
    }

    ranked
}

/// Catalogue filter; all criteria are conjunctive and optional.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RecommendationFilter {
    #[serde(default)]
    pub stream: Option<String>,
    #[serde(default)]
    pub difficulty_level: Option<String>,
    #[serde(default)]
    pub resource_type: Option<String>,
    #[serde(default)]
    pub max_weeks: Option<u32>,
    #[serde(default = "default_include_self_paced")]
    pub include_self_paced: bool,
}

fn default_include_self_paced() -> bool {
    true
}

impl Default for RecommendationFilter {
    fn default() -> Self {
        Self {
            stream: None,
            difficulty_level: None,
            resource_type: None,
            max_weeks: None,
            include_self_paced: true,
        }
    }
}

impl RecommendationFilter {
    pub fn matches(&self, stream: &StreamRecommendation) -> bool {
        if let Some(name) = &self.stream {
            if &stream.stream_name != name {
                return false;
            }
        }
        if let Some(level) = &self.difficulty_level {
            if &stream.difficulty_level != level {
                return false;
            }
        }
        if let Some(resource) = &self.resource_type {
            if &stream.resource_type != resource {
                return false;
            }
        }
        if !self.include_self_paced && stream.duration == "Self-paced" {
            return false;
        }
        if let Some(max_weeks) = self.max_weeks {
            if parse_duration_weeks(&stream.duration) > max_weeks {
                return false;
            }
        }
        true
    }
}

/// Applies a filter across the catalogue, preserving input order.
pub fn filter_streams(
    streams: &[StreamRecommendation],
    filter: &RecommendationFilter,
) -> Vec<StreamRecommendation> {
    streams
        .iter()
        .filter(|stream| filter.matches(stream))
        .cloned()
        .collect()
}

/// Best-effort duration parse: "Self-paced" and anything unparseable count
/// as zero weeks, so they satisfy any threshold.
pub fn parse_duration_weeks(raw: &str) -> u32 {
    if raw.contains("Self-paced") {
        return 0;
    }

    let lowered = raw.to_ascii_lowercase();
    let Some(first) = raw.split_whitespace().next() else {
        return 0;
    };
    let Ok(value) = first.parse::<u32>() else {
        return 0;
    };

    if lowered.contains("week") {
        value
    } else if lowered.contains("month") {
        value * 4
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stream(name: &str, category: &str) -> StreamRecommendation {
        StreamRecommendation {
            stream_name: name.to_string(),
            category: category.to_string(),
            description: format!("{name} fundamentals"),
            difficulty_level: "Beginner".to_string(),
            resource_type: "Course".to_string(),
            duration: "6 weeks".to_string(),
            url: None,
            platform: "OpenLearn".to_string(),
        }
    }

    fn profile(fields: &[(&str, u32)]) -> AffinityProfile {
        let mut profile = AffinityProfile::default();
        for (field, points) in fields {
            profile.add(field, *points);
        }
        profile
    }

    #[test]
    fn maps_fields_through_category_table() {
        assert_eq!(stream_category("Healthcare"), "Science");
        assert_eq!(stream_category("Creative Arts"), "Arts");
        assert_eq!(stream_category("Robotics"), "Robotics");
    }

    #[test]
    fn higher_ranked_fields_crowd_out_lower_ones() {
        let streams = vec![
            stream("Software Engineering", "Technology"),
            stream("Data Science", "Technology"),
            stream("Web Development", "Technology"),
            stream("Marketing", "Business"),
            stream("Finance", "Business"),
            stream("Accounting", "Business"),
        ];
        let profile = profile(&[("Technology", 4), ("Business", 2)]);

        let ranked = rank_streams(&profile, &streams, DEFAULT_RECOMMENDATION_CAP);

        assert_eq!(ranked.len(), 5);
        assert!(ranked[..3].iter().all(|r| r.career_field == "Technology"));
        assert!(ranked[3..].iter().all(|r| r.career_field == "Business"));
        assert!((ranked[0].match_score - 4.0).abs() < f64::EPSILON);
    }

    #[test]
    fn equal_averages_rank_in_input_order() {
        let streams = vec![
            stream("Finance", "Business"),
            stream("Nursing", "Science"),
        ];
        let profile = profile(&[("Business", 3), ("Healthcare", 3)]);

        let ranked = rank_streams(&profile, &streams, DEFAULT_RECOMMENDATION_CAP);
        assert_eq!(ranked[0].career_field, "Business");
        assert_eq!(ranked[1].career_field, "Healthcare");
    }

    #[test]
    fn unmapped_field_matches_its_own_category() {
        let streams = vec![stream("Drone Piloting", "Aviation")];
        let profile = profile(&[("Aviation", 4)]);

        let ranked = rank_streams(&profile, &streams, DEFAULT_RECOMMENDATION_CAP);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].stream.stream_name, "Drone Piloting");
    }

    #[test]
    fn durations_parse_to_weeks() {
        assert_eq!(parse_duration_weeks("Self-paced"), 0);
        assert_eq!(parse_duration_weeks("6 weeks"), 6);
        assert_eq!(parse_duration_weeks("1 week"), 1);
        assert_eq!(parse_duration_weeks("2 months"), 8);
        assert_eq!(parse_duration_weeks("garbage"), 0);
        assert_eq!(parse_duration_weeks(""), 0);
    }

    #[test]
    fn filter_criteria_are_conjunctive() {
        let mut catalogue = vec![
            stream("Software Engineering", "Technology"),
            stream("Data Science", "Technology"),
        ];
        catalogue[1].difficulty_level = "Advanced".to_string();
        catalogue[1].duration = "3 months".to_string();

        // "3 months" parses to 12 weeks, right at the threshold.
        let filter = RecommendationFilter {
            difficulty_level: Some("Advanced".to_string()),
            max_weeks: Some(12),
            ..RecommendationFilter::default()
        };
        let matched = filter_streams(&catalogue, &filter);
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].stream_name, "Data Science");

        let too_tight = RecommendationFilter {
            difficulty_level: Some("Advanced".to_string()),
            max_weeks: Some(11),
            ..RecommendationFilter::default()
        };
        assert!(filter_streams(&catalogue, &too_tight).is_empty());
    }

    #[test]
    fn self_paced_streams_can_be_excluded() {
        let mut catalogue = vec![
            stream("Software Engineering", "Technology"),
            stream("Data Science", "Technology"),
        ];
        catalogue[0].duration = "Self-paced".to_string();

        let filter = RecommendationFilter {
            include_self_paced: false,
            ..RecommendationFilter::default()
        };
        let matched = filter_streams(&catalogue, &filter);
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].stream_name, "Data Science");
    }

    #[test]
    fn unparseable_duration_satisfies_any_threshold() {
        let mut catalogue = vec![stream("Workshop Series", "Arts")];
        catalogue[0].duration = "rolling enrollment".to_string();

        let filter = RecommendationFilter {
            max_weeks: Some(1),
            ..RecommendationFilter::default()
        };
        assert_eq!(filter_streams(&catalogue, &filter).len(), 1);
    }
}
