//! Domain records and request payloads for the CodiCue API.
//!
//! # Design
//! `StylistInfo` and `Garment` are only ever produced by decoding a list
//! response, so they implement `LenientDecode` rather than relying on a
//! strict serde `Deserialize` of the wire format. They still derive serde so
//! the FFI crate can hand the normalized records back to the host as JSON and
//! test vectors can state expected results.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::decode::{Fields, LenientDecode};

/// A stylist's public profile as returned by `GET stylists`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StylistInfo {
    pub id: i64,
    pub name: String,
    /// Nominally 0.0 to 5.0; the server's value is not clamped.
    pub rating: f64,
    pub review_count: u32,
    pub is_verified: bool,
    pub introduction: String,
    /// Display order is significant.
    pub career: Vec<String>,
    pub profile_image_url: String,
    pub specialty_styles: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl LenientDecode for StylistInfo {
    fn decode(fields: &mut Fields<'_>) -> Self {
        StylistInfo {
            id: fields.int("id"),
            name: fields.string("name"),
            rating: fields.float("rating"),
            review_count: fields.count("reviewCount"),
            is_verified: fields.bool("isVerified"),
            introduction: fields.string("introduction"),
            career: fields.string_list("career"),
            profile_image_url: fields.string("profileImageUrl"),
            specialty_styles: fields.string_list("specialtyStyles"),
            created_at: fields.timestamp("createdAt"),
            updated_at: fields.timestamp("updatedAt"),
        }
    }
}

/// A clothing item in a user's closet, as returned by `GET user/items`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Garment {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub category: GarmentCategory,
    #[serde(rename = "imageUrl")]
    pub image_url: String,
    pub recommended_body_type: Vec<BodyType>,
    pub advice: Option<String>,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl LenientDecode for Garment {
    fn decode(fields: &mut Fields<'_>) -> Self {
        Garment {
            id: fields.int("id"),
            user_id: fields.int("userId"),
            name: fields.string("name"),
            category: fields.enum_or("category", GarmentCategory::Top),
            image_url: fields.string("imageUrl"),
            recommended_body_type: fields.enum_list("recommendedBodyType"),
            advice: fields.opt_string("advice"),
            tags: fields.string_list("tags"),
            created_at: fields.timestamp("createdAt"),
            updated_at: fields.timestamp("updatedAt"),
        }
    }
}

/// Raised when a wire string names no known variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownVariant(pub String);

impl fmt::Display for UnknownVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown variant `{}`", self.0)
    }
}

impl std::error::Error for UnknownVariant {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GarmentCategory {
    Top,
    Bottom,
    Shoes,
    Accessory,
}

impl GarmentCategory {
    pub const ALL: [GarmentCategory; 4] = [
        GarmentCategory::Top,
        GarmentCategory::Bottom,
        GarmentCategory::Shoes,
        GarmentCategory::Accessory,
    ];

    pub fn as_wire(&self) -> &'static str {
        match self {
            GarmentCategory::Top => "TOP",
            GarmentCategory::Bottom => "BOTTOM",
            GarmentCategory::Shoes => "SHOES",
            GarmentCategory::Accessory => "ACCESSORY",
        }
    }

    /// Label shown on the closet tabs.
    pub fn label(&self) -> &'static str {
        match self {
            GarmentCategory::Top => "상의",
            GarmentCategory::Bottom => "하의",
            GarmentCategory::Shoes => "신발",
            GarmentCategory::Accessory => "신발 및 액세서리",
        }
    }
}

impl FromStr for GarmentCategory {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_wire() == s)
            .ok_or_else(|| UnknownVariant(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BodyType {
    Rectangle,
    Hourglass,
    Triangle,
    InvertedTriangle,
    Oval,
}

impl BodyType {
    pub const ALL: [BodyType; 5] = [
        BodyType::Rectangle,
        BodyType::Hourglass,
        BodyType::Triangle,
        BodyType::InvertedTriangle,
        BodyType::Oval,
    ];

    pub fn as_wire(&self) -> &'static str {
        match self {
            BodyType::Rectangle => "RECTANGLE",
            BodyType::Hourglass => "HOURGLASS",
            BodyType::Triangle => "TRIANGLE",
            BodyType::InvertedTriangle => "INVERTED_TRIANGLE",
            BodyType::Oval => "OVAL",
        }
    }
}

impl FromStr for BodyType {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|b| b.as_wire() == s)
            .ok_or_else(|| UnknownVariant(s.to_string()))
    }
}

/// Request payload for `auth/login` and `auth/stylist/login`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Request payload for `POST user`.
///
/// Height and weight travel as the strings typed into the sign-up form.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    pub email: String,
    pub password: String,
    pub name: String,
    pub height: String,
    pub weight: String,
    pub preferred_style: Vec<String>,
}

/// Success payload of every auth endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessToken {
    pub access_token: String,
}
