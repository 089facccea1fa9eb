//! Guest records and the small enums attached to them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Category assigned to imported guests when the CSV leaves it blank
pub const IMPORTED_CATEGORY: &str = "Imported";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum GuestStatus {
    Attending,
    Declined,
    #[default]
    Pending,
}

impl fmt::Display for GuestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            GuestStatus::Attending => "Attending",
            GuestStatus::Declined => "Declined",
            GuestStatus::Pending => "Pending",
        };
        f.write_str(s)
    }
}

impl FromStr for GuestStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "attending" => Ok(GuestStatus::Attending),
            "declined" => Ok(GuestStatus::Declined),
            "pending" => Ok(GuestStatus::Pending),
            other => Err(format!(
                "Invalid RSVP status '{}'. Valid values: Attending, Declined, Pending",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum MealPreference {
    #[default]
    #[serde(rename = "Not Specified")]
    NotSpecified,
    Chicken,
    Fish,
    Vegetarian,
}

impl fmt::Display for MealPreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            MealPreference::NotSpecified => "Not Specified",
            MealPreference::Chicken => "Chicken",
            MealPreference::Fish => "Fish",
            MealPreference::Vegetarian => "Vegetarian",
        };
        f.write_str(s)
    }
}

impl FromStr for MealPreference {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s.chars().filter(|c| !c.is_whitespace()).collect::<String>().to_lowercase();
        match key.as_str() {
            "notspecified" | "none" => Ok(MealPreference::NotSpecified),
            "chicken" => Ok(MealPreference::Chicken),
            "fish" => Ok(MealPreference::Fish),
            "vegetarian" => Ok(MealPreference::Vegetarian),
            _ => Err(format!(
                "Invalid meal preference '{}'. Valid values: Not Specified, Chicken, Fish, Vegetarian",
                s.trim()
            )),
        }
    }
}

/// A guest record that has not been assigned an identity yet.
///
/// Produced by the CSV importer and by manual `guest add`; the store turns it
/// into a [`Guest`] by assigning an id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewGuest {
    pub name: String,
    pub status: GuestStatus,
    pub party_size: u32,
    pub contact: String,
    pub meal_preference: MealPreference,
    pub category: String,
    pub notes: String,
}

impl NewGuest {
    /// A pending, single-person entry with every optional field empty
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: GuestStatus::Pending,
            party_size: 1,
            contact: String::new(),
            meal_preference: MealPreference::NotSpecified,
            category: String::new(),
            notes: String::new(),
        }
    }

    pub fn with_id(self, id: String) -> Guest {
        Guest {
            id,
            name: self.name,
            status: self.status,
            party_size: self.party_size,
            contact: self.contact,
            meal_preference: self.meal_preference,
            category: self.category,
            notes: self.notes,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Guest {
    pub id: String,
    pub name: String,
    pub status: GuestStatus,
    pub party_size: u32,
    #[serde(default)]
    pub contact: String,
    #[serde(default)]
    pub meal_preference: MealPreference,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub notes: String,
}

impl Guest {
    /// Separate the identity from the editable fields
    pub fn split(self) -> (String, NewGuest) {
        let fields = NewGuest {
            name: self.name,
            status: self.status,
            party_size: self.party_size,
            contact: self.contact,
            meal_preference: self.meal_preference,
            category: self.category,
            notes: self.notes,
        };
        (self.id, fields)
    }
}

/// Generate a fresh store identity for a guest
pub fn generate_guest_id() -> String {
    format!("g_{}", uuid::Uuid::new_v4().simple())
}

/// Headline RSVP figures for a guest list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GuestSummary {
    pub total_parties: usize,
    pub attending_parties: usize,
    pub declined_parties: usize,
    pub pending_parties: usize,
    /// Sum of party sizes over attending guests
    pub attending_headcount: u32,
}

impl GuestSummary {
    pub fn from_guests(guests: &[Guest]) -> Self {
        guests.iter().fold(Self::default(), |mut summary, guest| {
            summary.total_parties += 1;
            match guest.status {
                GuestStatus::Attending => {
                    summary.attending_parties += 1;
                    summary.attending_headcount =
                        summary.attending_headcount.saturating_add(guest.party_size);
                }
                GuestStatus::Declined => summary.declined_parties += 1,
                GuestStatus::Pending => summary.pending_parties += 1,
            }
            summary
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("attending", GuestStatus::Attending)]
    #[test_case(" Declined ", GuestStatus::Declined)]
    #[test_case("PENDING", GuestStatus::Pending)]
    fn test_status_parsing(input: &str, expected: GuestStatus) {
        assert_eq!(input.parse::<GuestStatus>().unwrap(), expected);
    }

    #[test]
    fn test_status_parsing_rejects_unknown() {
        assert!("maybe".parse::<GuestStatus>().is_err());
    }

    #[test_case("Not Specified", MealPreference::NotSpecified)]
    #[test_case("notspecified", MealPreference::NotSpecified)]
    #[test_case("fish", MealPreference::Fish)]
    #[test_case("Vegetarian", MealPreference::Vegetarian)]
    fn test_meal_parsing(input: &str, expected: MealPreference) {
        assert_eq!(input.parse::<MealPreference>().unwrap(), expected);
    }

    #[test]
    fn test_meal_serializes_with_space() {
        let json = serde_json::to_string(&MealPreference::NotSpecified).unwrap();
        assert_eq!(json, "\"Not Specified\"");
    }

    #[test]
    fn test_generated_ids_are_unique() {
        let a = generate_guest_id();
        let b = generate_guest_id();
        assert!(a.starts_with("g_"));
        assert_ne!(a, b);
    }

    #[test]
    fn test_summary_counts_headcount_of_attending_only() {
        let guests = vec![
            NewGuest { status: GuestStatus::Attending, party_size: 2, ..NewGuest::named("Susan & Bob Smith") }
                .with_id("g1".into()),
            NewGuest { status: GuestStatus::Declined, ..NewGuest::named("Mike Johnson") }
                .with_id("g2".into()),
            NewGuest { party_size: 2, ..NewGuest::named("Jessica Bloom & Guest") }.with_id("g3".into()),
            NewGuest { status: GuestStatus::Attending, party_size: 4, ..NewGuest::named("The Davis Family") }
                .with_id("g4".into()),
        ];

        let summary = GuestSummary::from_guests(&guests);
        assert_eq!(summary.total_parties, 4);
        assert_eq!(summary.attending_parties, 2);
        assert_eq!(summary.declined_parties, 1);
        assert_eq!(summary.pending_parties, 1);
        assert_eq!(summary.attending_headcount, 6);
    }
}
