//! Playlist assembly from stored recommendations, plus age-banded fallbacks.

use sprout_core::{
    AnimeItem, EventItem, HobbyItem, LessonItem, MovieItem, MusicItem, Playlist,
    PlaylistActivities, PlaylistContent, Recommendation, ShowItem,
};

/// Age bands used to pick fallback content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgeBand {
    Preschool,
    Elementary,
    Older,
}

impl AgeBand {
    pub fn for_age(age: i32) -> Self {
        if age <= 5 {
            AgeBand::Preschool
        } else if age <= 8 {
            AgeBand::Elementary
        } else {
            AgeBand::Older
        }
    }
}

fn has_tag(rec: &Recommendation, tag: &str) -> bool {
    rec.tags.iter().any(|t| t == tag)
}

/// Group stored recommendations into playlist sections.
///
/// `CONTENT` rows are routed by category (music, movie, show/tv, anime) and
/// `ACTIVITY` rows by hobby, lesson, or event. Empty music and movie sections
/// receive one generic item.
pub fn playlist_from_recommendations(recommendations: &[Recommendation]) -> Playlist {
    let mut content = PlaylistContent::default();
    let mut activities = PlaylistActivities::default();

    for rec in recommendations {
        let category = rec.category.to_lowercase();
        match rec.recommendation_type.as_str() {
            "CONTENT" => {
                if category.contains("music") {
                    content.music.push(MusicItem {
                        title: rec.title.clone(),
                        artist: "Various Artists".to_string(),
                        reason: rec.description.clone(),
                        age_appropriate: true,
                        mood: if has_tag(rec, "colorful") { "happy" } else { "calm" }.to_string(),
                    });
                } else if category.contains("movie") {
                    content.movies.push(MovieItem {
                        title: rec.title.clone(),
                        genre: "Family".to_string(),
                        reason: rec.description.clone(),
                        duration: "90 min".to_string(),
                        rating: "G".to_string(),
                    });
                } else if category.contains("show") || category.contains("tv") {
                    content.shows.push(ShowItem {
                        title: rec.title.clone(),
                        platform: "Various".to_string(),
                        reason: rec.description.clone(),
                        episodes: "Multiple episodes".to_string(),
                        educational: has_tag(rec, "learning") || has_tag(rec, "educational"),
                    });
                } else if category.contains("anime") {
                    content.anime.push(AnimeItem {
                        title: rec.title.clone(),
                        reason: rec.description.clone(),
                        age_rating: "All Ages".to_string(),
                        themes: rec.tags.clone(),
                    });
                }
            }
            "ACTIVITY" => {
                if category.contains("hobby") {
                    activities.hobbies.push(HobbyItem {
                        name: rec.title.clone(),
                        description: rec.description.clone(),
                        reason: format!("Based on interests: {}", rec.tags.join(", ")),
                        difficulty: "Beginner".to_string(),
                        materials: rec
                            .tags
                            .iter()
                            .filter(|t| *t != "nature" && *t != "observation")
                            .cloned()
                            .collect(),
                    });
                } else if category.contains("lesson") {
                    activities.lessons.push(LessonItem {
                        name: rec.title.clone(),
                        lesson_type: "In-person".to_string(),
                        reason: rec.description.clone(),
                        frequency: "Weekly".to_string(),
                        benefits: rec.tags.clone(),
                    });
                } else if category.contains("event") {
                    activities.events.push(EventItem {
                        name: rec.title.clone(),
                        location: rec
                            .location
                            .clone()
                            .unwrap_or_else(|| "Local venue".to_string()),
                        reason: rec.description.clone(),
                        date: "This weekend".to_string(),
                        family_friendly: true,
                    });
                }
            }
            _ => {}
        }
    }

    if content.music.is_empty() {
        content.music.push(MusicItem {
            title: "Kid-Friendly Playlist".to_string(),
            artist: "Various Artists".to_string(),
            reason: "Age-appropriate music for daily activities".to_string(),
            age_appropriate: true,
            mood: "happy".to_string(),
        });
    }
    if content.movies.is_empty() {
        content.movies.push(MovieItem {
            title: "Family Movie Selection".to_string(),
            genre: "Animation".to_string(),
            reason: "Recommended based on age and interests".to_string(),
            duration: "90 min".to_string(),
            rating: "G".to_string(),
        });
    }

    Playlist {
        content,
        activities,
    }
}

fn pick<'a>(band: AgeBand, preschool: &'a str, other: &'a str) -> String {
    match band {
        AgeBand::Preschool => preschool,
        AgeBand::Elementary | AgeBand::Older => other,
    }
    .to_string()
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Fixed playlist used when generation fails and nothing is stored.
pub fn fallback_playlist(age: i32) -> Playlist {
    let band = AgeBand::for_age(age);
    let preschool = band == AgeBand::Preschool;

    Playlist {
        content: PlaylistContent {
            music: vec![MusicItem {
                title: pick(band, "The Wheels on the Bus", "Count on Me"),
                artist: pick(band, "Super Simple Songs", "Bruno Mars"),
                reason: format!(
                    "Age-appropriate music that encourages {}",
                    pick(band, "movement and learning", "positive values and friendship")
                ),
                age_appropriate: true,
                mood: "happy".to_string(),
            }],
            movies: vec![MovieItem {
                title: pick(band, "Finding Nemo", "Inside Out"),
                genre: "Animation".to_string(),
                reason: format!(
                    "Supports emotional development and curiosity about {}",
                    pick(band, "ocean life", "feelings and growing up")
                ),
                duration: "90 min".to_string(),
                rating: "G".to_string(),
            }],
            shows: vec![ShowItem {
                title: pick(band, "Bluey", "Avatar: The Last Airbender"),
                platform: pick(band, "Disney+", "Netflix"),
                reason: format!(
                    "Encourages {}",
                    pick(band, "imagination and family play", "perseverance and friendship")
                ),
                episodes: pick(band, "150+ episodes", "61 episodes"),
                educational: true,
            }],
            anime: vec![AnimeItem {
                title: pick(band, "My Neighbor Totoro", "Kiki's Delivery Service"),
                reason: "Gentle storytelling that nurtures imagination and independence"
                    .to_string(),
                age_rating: "All Ages".to_string(),
                themes: strings(&["friendship", "nature", "growing up"]),
            }],
        },
        activities: PlaylistActivities {
            hobbies: vec![HobbyItem {
                name: pick(band, "Nature Collecting", "Science Experiments"),
                description: pick(
                    band,
                    "Collecting leaves, rocks, and flowers",
                    "Safe kitchen science experiments",
                ),
                reason: "Encourages observation skills and curiosity about the natural world"
                    .to_string(),
                difficulty: "Beginner".to_string(),
                materials: if preschool {
                    strings(&["collection box", "magnifying glass"])
                } else {
                    strings(&["baking soda", "vinegar", "food coloring"])
                },
            }],
            lessons: vec![LessonItem {
                name: pick(band, "Music & Movement", "Art Classes"),
                lesson_type: "In-person".to_string(),
                reason: "Supports creative expression and motor skill development".to_string(),
                frequency: "Weekly".to_string(),
                benefits: strings(&["creativity", "coordination", "social skills"]),
            }],
            events: vec![EventItem {
                name: pick(band, "Children's Museum Visit", "Science Museum Workshop"),
                location: "Local museum".to_string(),
                reason: "Hands-on learning experience that sparks curiosity".to_string(),
                date: "This weekend".to_string(),
                family_friendly: true,
            }],
        },
    }
}
