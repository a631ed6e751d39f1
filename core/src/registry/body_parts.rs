//! Crit location normalization.
//!
//! Wound lines name locations in prose; persistence maps the captured text
//! to a canonical body part through this table. Unmapped locations are
//! logged by the caller and skipped, never applied.

use phf::phf_map;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BodyPart {
    Head,
    Neck,
    Chest,
    Back,
    Abdomen,
    LeftArm,
    RightArm,
    LeftHand,
    RightHand,
    LeftLeg,
    RightLeg,
    LeftEye,
    RightEye,
    Tail,
}

impl BodyPart {
    pub fn label(&self) -> &'static str {
        match self {
            BodyPart::Head => "head",
            BodyPart::Neck => "neck",
            BodyPart::Chest => "chest",
            BodyPart::Back => "back",
            BodyPart::Abdomen => "abdomen",
            BodyPart::LeftArm => "left arm",
            BodyPart::RightArm => "right arm",
            BodyPart::LeftHand => "left hand",
            BodyPart::RightHand => "right hand",
            BodyPart::LeftLeg => "left leg",
            BodyPart::RightLeg => "right leg",
            BodyPart::LeftEye => "left eye",
            BodyPart::RightEye => "right eye",
            BodyPart::Tail => "tail",
        }
    }
}

/// Location text lookup table, keyed by lowercased prose
pub static BODY_PARTS: phf::Map<&'static str, BodyPart> = phf_map! {
    "head" => BodyPart::Head,
    "skull" => BodyPart::Head,
    "face" => BodyPart::Head,
    "neck" => BodyPart::Neck,
    "throat" => BodyPart::Neck,
    "chest" => BodyPart::Chest,
    "ribs" => BodyPart::Chest,
    "back" => BodyPart::Back,
    "spine" => BodyPart::Back,
    "abdomen" => BodyPart::Abdomen,
    "stomach" => BodyPart::Abdomen,
    "gut" => BodyPart::Abdomen,
    "left arm" => BodyPart::LeftArm,
    "right arm" => BodyPart::RightArm,
    "left hand" => BodyPart::LeftHand,
    "right hand" => BodyPart::RightHand,
    "left leg" => BodyPart::LeftLeg,
    "right leg" => BodyPart::RightLeg,
    "left eye" => BodyPart::LeftEye,
    "right eye" => BodyPart::RightEye,
    "tail" => BodyPart::Tail,
};

/// Normalize captured location text to a canonical body part.
pub fn normalize_location(text: &str) -> Option<BodyPart> {
    let key = text.trim().to_ascii_lowercase();
    BODY_PARTS.get(key.as_str()).copied()
}
