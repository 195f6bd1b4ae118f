//! Pelt generation and inheritance.
//!
//! A pelt is the physical appearance record of a cat: coat kind, colour,
//! fur length, eyes, white patches, tortie markings, skin, scars and an
//! optional accessory. Newly joined cats roll a pelt from the weighted tables
//! below; kits inherit most traits from their parents with a small mutation
//! chance.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::weighted::{one_in, percent, pick, pick_uniform};

/// Coarse colour family, used by names and inheritance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColourGroup {
    White,
    Grey,
    Black,
    Ginger,
    Brown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PeltColour {
    White,
    PaleGrey,
    Silver,
    Grey,
    DarkGrey,
    Ghost,
    Black,
    Cream,
    PaleGinger,
    Golden,
    Ginger,
    DarkGinger,
    Sienna,
    LightBrown,
    Lilac,
    Brown,
    GoldenBrown,
    DarkBrown,
    Chocolate,
}

impl PeltColour {
    pub const ALL: [PeltColour; 19] = [
        PeltColour::White,
        PeltColour::PaleGrey,
        PeltColour::Silver,
        PeltColour::Grey,
        PeltColour::DarkGrey,
        PeltColour::Ghost,
        PeltColour::Black,
        PeltColour::Cream,
        PeltColour::PaleGinger,
        PeltColour::Golden,
        PeltColour::Ginger,
        PeltColour::DarkGinger,
        PeltColour::Sienna,
        PeltColour::LightBrown,
        PeltColour::Lilac,
        PeltColour::Brown,
        PeltColour::GoldenBrown,
        PeltColour::DarkBrown,
        PeltColour::Chocolate,
    ];

    pub fn group(self) -> ColourGroup {
        use PeltColour::*;
        match self {
            White => ColourGroup::White,
            PaleGrey | Silver | Grey | DarkGrey => ColourGroup::Grey,
            Ghost | Black => ColourGroup::Black,
            Cream | PaleGinger | Golden | Ginger | DarkGinger | Sienna => ColourGroup::Ginger,
            LightBrown | Lilac | Brown | GoldenBrown | DarkBrown | Chocolate => ColourGroup::Brown,
        }
    }

    pub fn label(self) -> &'static str {
        use PeltColour::*;
        match self {
            White => "white",
            PaleGrey => "pale grey",
            Silver => "silver",
            Grey => "grey",
            DarkGrey => "dark grey",
            Ghost => "ghost",
            Black => "black",
            Cream => "cream",
            PaleGinger => "pale ginger",
            Golden => "golden",
            Ginger => "ginger",
            DarkGinger => "dark ginger",
            Sienna => "sienna",
            LightBrown => "light brown",
            Lilac => "lilac",
            Brown => "brown",
            GoldenBrown => "golden brown",
            DarkBrown => "dark brown",
            Chocolate => "chocolate",
        }
    }

    /// All colours in a family.
    pub fn in_group(group: ColourGroup) -> Vec<PeltColour> {
        Self::ALL.iter().copied().filter(|c| c.group() == group).collect()
    }
}

static COLOUR_WEIGHTS: &[(PeltColour, u32)] = &[
    (PeltColour::White, 6),
    (PeltColour::PaleGrey, 5),
    (PeltColour::Silver, 4),
    (PeltColour::Grey, 8),
    (PeltColour::DarkGrey, 6),
    (PeltColour::Ghost, 2),
    (PeltColour::Black, 9),
    (PeltColour::Cream, 4),
    (PeltColour::PaleGinger, 5),
    (PeltColour::Golden, 4),
    (PeltColour::Ginger, 8),
    (PeltColour::DarkGinger, 5),
    (PeltColour::Sienna, 3),
    (PeltColour::LightBrown, 5),
    (PeltColour::Lilac, 2),
    (PeltColour::Brown, 8),
    (PeltColour::GoldenBrown, 4),
    (PeltColour::DarkBrown, 5),
    (PeltColour::Chocolate, 3),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PeltKind {
    SingleColour,
    TwoColour,
    Tabby,
    Mackerel,
    Classic,
    Ticked,
    Agouti,
    Masked,
    Spotted,
    Speckled,
    Bengal,
    Marbled,
    Rosette,
    Smoke,
    Singlestripe,
    Tortie,
    Calico,
}

impl PeltKind {
    pub fn is_tortie(self) -> bool {
        matches!(self, PeltKind::Tortie | PeltKind::Calico)
    }

    pub fn is_tabby(self) -> bool {
        matches!(
            self,
            PeltKind::Tabby
                | PeltKind::Mackerel
                | PeltKind::Classic
                | PeltKind::Ticked
                | PeltKind::Agouti
                | PeltKind::Masked
        )
    }

    pub fn is_spotted(self) -> bool {
        matches!(
            self,
            PeltKind::Spotted | PeltKind::Speckled | PeltKind::Bengal | PeltKind::Rosette
        )
    }

    pub fn is_striped(self) -> bool {
        self.is_tabby() || self == PeltKind::Singlestripe
    }

    pub fn noun(self) -> &'static str {
        match self {
            PeltKind::SingleColour | PeltKind::TwoColour => "cat",
            PeltKind::Tabby => "tabby",
            PeltKind::Mackerel => "mackerel tabby",
            PeltKind::Classic => "classic tabby",
            PeltKind::Ticked => "ticked tabby",
            PeltKind::Agouti => "agouti",
            PeltKind::Masked => "masked tabby",
            PeltKind::Spotted => "spotted cat",
            PeltKind::Speckled => "speckled cat",
            PeltKind::Bengal => "bengal",
            PeltKind::Marbled => "marbled cat",
            PeltKind::Rosette => "rosetted cat",
            PeltKind::Smoke => "smoke",
            PeltKind::Singlestripe => "striped cat",
            PeltKind::Tortie => "tortoiseshell",
            PeltKind::Calico => "calico",
        }
    }
}

static KIND_WEIGHTS: &[(PeltKind, u32)] = &[
    (PeltKind::SingleColour, 20),
    (PeltKind::TwoColour, 8),
    (PeltKind::Tabby, 12),
    (PeltKind::Mackerel, 8),
    (PeltKind::Classic, 8),
    (PeltKind::Ticked, 6),
    (PeltKind::Agouti, 4),
    (PeltKind::Masked, 3),
    (PeltKind::Spotted, 8),
    (PeltKind::Speckled, 5),
    (PeltKind::Bengal, 3),
    (PeltKind::Marbled, 3),
    (PeltKind::Rosette, 3),
    (PeltKind::Smoke, 5),
    (PeltKind::Singlestripe, 4),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum FurLength {
    Short,
    Medium,
    Long,
}

static LENGTH_WEIGHTS: &[(FurLength, u32)] = &[
    (FurLength::Short, 45),
    (FurLength::Medium, 35),
    (FurLength::Long, 20),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EyeColour {
    Yellow,
    Amber,
    Hazel,
    PaleGreen,
    Green,
    Emerald,
    Blue,
    DarkBlue,
    PaleBlue,
    Grey,
    Copper,
    Sage,
}

impl EyeColour {
    pub fn label(self) -> &'static str {
        match self {
            EyeColour::Yellow => "yellow",
            EyeColour::Amber => "amber",
            EyeColour::Hazel => "hazel",
            EyeColour::PaleGreen => "pale green",
            EyeColour::Green => "green",
            EyeColour::Emerald => "emerald",
            EyeColour::Blue => "blue",
            EyeColour::DarkBlue => "dark blue",
            EyeColour::PaleBlue => "pale blue",
            EyeColour::Grey => "grey",
            EyeColour::Copper => "copper",
            EyeColour::Sage => "sage",
        }
    }
}

static EYE_WEIGHTS: &[(EyeColour, u32)] = &[
    (EyeColour::Yellow, 12),
    (EyeColour::Amber, 10),
    (EyeColour::Hazel, 8),
    (EyeColour::PaleGreen, 6),
    (EyeColour::Green, 10),
    (EyeColour::Emerald, 3),
    (EyeColour::Blue, 8),
    (EyeColour::DarkBlue, 3),
    (EyeColour::PaleBlue, 4),
    (EyeColour::Grey, 3),
    (EyeColour::Copper, 4),
    (EyeColour::Sage, 3),
];

/// How much of the coat is white.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum WhitePatches {
    Little,
    Mid,
    High,
    Mostly,
    Full,
}

impl WhitePatches {
    const ORDER: [WhitePatches; 5] = [
        WhitePatches::Little,
        WhitePatches::Mid,
        WhitePatches::High,
        WhitePatches::Mostly,
        WhitePatches::Full,
    ];

    fn index(self) -> usize {
        Self::ORDER.iter().position(|w| *w == self).unwrap_or(0)
    }

    fn suffix(self) -> &'static str {
        match self {
            WhitePatches::Little => " with a few white markings",
            WhitePatches::Mid => " with white patches",
            WhitePatches::High => " with lots of white",
            WhitePatches::Mostly => " that is mostly white",
            WhitePatches::Full => "",
        }
    }
}

static WHITE_WEIGHTS: &[(WhitePatches, u32)] = &[
    (WhitePatches::Little, 40),
    (WhitePatches::Mid, 30),
    (WhitePatches::High, 15),
    (WhitePatches::Mostly, 10),
    (WhitePatches::Full, 5),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Skin {
    Black,
    Pink,
    DarkBrown,
    Brown,
    LightBrown,
    Red,
}

static SKINS: &[Skin] = &[
    Skin::Black,
    Skin::Pink,
    Skin::DarkBrown,
    Skin::Brown,
    Skin::LightBrown,
    Skin::Red,
];

/// Permanent marks left by injuries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Scar {
    NickedEar,
    TornEar,
    FaceScar,
    ChestScar,
    LegScar,
    BackScar,
    TailScar,
    NoTail,
    NoEar,
    BlindEye,
    BurnMark,
}

impl Scar {
    pub fn label(self) -> &'static str {
        match self {
            Scar::NickedEar => "nicked ear",
            Scar::TornEar => "torn ear",
            Scar::FaceScar => "scarred face",
            Scar::ChestScar => "scarred chest",
            Scar::LegScar => "scarred leg",
            Scar::BackScar => "scarred back",
            Scar::TailScar => "scarred tail",
            Scar::NoTail => "missing tail",
            Scar::NoEar => "missing ear",
            Scar::BlindEye => "clouded eye",
            Scar::BurnMark => "burn mark",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Accessory {
    MapleLeaf,
    Holly,
    BlueBerries,
    ForgetMeNots,
    Lavender,
    RobinFeather,
    JayFeather,
    DoveFeather,
    RedCollar,
    BlueCollar,
    BellCollar,
}

impl Accessory {
    pub fn is_collar(self) -> bool {
        matches!(self, Accessory::RedCollar | Accessory::BlueCollar | Accessory::BellCollar)
    }
}

pub static WILD_ACCESSORIES: &[Accessory] = &[
    Accessory::MapleLeaf,
    Accessory::Holly,
    Accessory::BlueBerries,
    Accessory::ForgetMeNots,
    Accessory::Lavender,
    Accessory::RobinFeather,
    Accessory::JayFeather,
    Accessory::DoveFeather,
];

pub static COLLARS: &[Accessory] = &[
    Accessory::RedCollar,
    Accessory::BlueCollar,
    Accessory::BellCollar,
];

/// The sex used for tortie odds. Gender alignment lives on the cat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    Female,
    Male,
}

impl Gender {
    pub fn random(rng: &mut impl Rng) -> Self {
        if rng.gen_bool(0.5) {
            Gender::Female
        } else {
            Gender::Male
        }
    }
}

/// A cat's appearance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pelt {
    pub kind: PeltKind,
    pub colour: PeltColour,
    pub length: FurLength,
    pub eye_colour: EyeColour,
    /// Second eye colour for heterochromatic cats.
    pub eye_colour2: Option<EyeColour>,
    pub white: Option<WhitePatches>,
    /// Pattern underneath tortie patches.
    pub tortie_base: Option<PeltKind>,
    pub tortie_colour: Option<PeltColour>,
    pub skin: Skin,
    pub scars: Vec<Scar>,
    pub accessory: Option<Accessory>,
}

impl Pelt {
    /// Roll a completely new pelt.
    pub fn random(gender: Gender, rng: &mut impl Rng) -> Self {
        let colour = pick(COLOUR_WEIGHTS, rng).unwrap_or(PeltColour::Grey);
        let tortie_roll = match gender {
            Gender::Female => one_in(6, rng),
            Gender::Male => one_in(150, rng),
        };
        let kind = if tortie_roll {
            if one_in(3, rng) {
                PeltKind::Calico
            } else {
                PeltKind::Tortie
            }
        } else {
            pick(KIND_WEIGHTS, rng).unwrap_or(PeltKind::SingleColour)
        };

        let mut pelt = Self {
            kind,
            colour,
            length: pick(LENGTH_WEIGHTS, rng).unwrap_or(FurLength::Short),
            eye_colour: pick(EYE_WEIGHTS, rng).unwrap_or(EyeColour::Yellow),
            eye_colour2: None,
            white: None,
            tortie_base: None,
            tortie_colour: None,
            skin: pick_uniform(SKINS, rng).unwrap_or(Skin::Pink),
            scars: Vec::new(),
            accessory: None,
        };
        if one_in(50, rng) {
            pelt.eye_colour2 = pick(EYE_WEIGHTS, rng).filter(|e| *e != pelt.eye_colour);
        }
        pelt.white = pelt.roll_white(20, None, rng);
        pelt.fix_tortie(rng);
        pelt
    }

    /// Inherit a pelt from zero, one or two parents.
    pub fn inherit(parents: &[&Pelt], gender: Gender, rng: &mut impl Rng) -> Self {
        if parents.is_empty() {
            return Self::random(gender, rng);
        }
        let colour = if percent(70, rng) {
            let base = any_parent(parents, rng).colour;
            if percent(25, rng) {
                pick_uniform(&PeltColour::in_group(base.group()), rng).unwrap_or(base)
            } else {
                base
            }
        } else if percent(85, rng) {
            let group = any_parent(parents, rng).colour.group();
            pick_uniform(&PeltColour::in_group(group), rng).unwrap_or(PeltColour::Grey)
        } else {
            pick(COLOUR_WEIGHTS, rng).unwrap_or(PeltColour::Grey)
        };

        let parent_tortie = parents.iter().any(|p| p.kind.is_tortie());
        let mixed_colours = parents.len() > 1
            && parents.iter().any(|p| p.colour.group() == ColourGroup::Ginger)
            && parents.iter().any(|p| p.colour.group() != ColourGroup::Ginger);
        let tortie_roll = match gender {
            Gender::Female if parent_tortie || mixed_colours => percent(40, rng),
            Gender::Female => one_in(8, rng),
            Gender::Male => one_in(150, rng),
        };

        let kind = if tortie_roll {
            if parents.iter().any(|p| p.kind == PeltKind::Calico) && percent(50, rng) {
                PeltKind::Calico
            } else {
                PeltKind::Tortie
            }
        } else if percent(75, rng) {
            let p = any_parent(parents, rng);
            p.tortie_base.unwrap_or(p.kind)
        } else {
            pick(KIND_WEIGHTS, rng).unwrap_or(PeltKind::SingleColour)
        };

        let length = if percent(80, rng) {
            any_parent(parents, rng).length
        } else {
            pick(LENGTH_WEIGHTS, rng).unwrap_or(FurLength::Medium)
        };

        let eye_colour = if percent(75, rng) {
            any_parent(parents, rng).eye_colour
        } else {
            pick(EYE_WEIGHTS, rng).unwrap_or(EyeColour::Amber)
        };
        let hetero_parent = parents.iter().find_map(|p| p.eye_colour2);
        let eye_colour2 = match hetero_parent {
            Some(e) if one_in(4, rng) => Some(e),
            _ if one_in(50, rng) => pick(EYE_WEIGHTS, rng),
            _ => None,
        }
        .filter(|e| *e != eye_colour);

        let mut pelt = Self {
            kind,
            colour,
            length,
            eye_colour,
            eye_colour2,
            white: None,
            tortie_base: None,
            tortie_colour: None,
            skin: any_parent(parents, rng).skin,
            scars: Vec::new(),
            accessory: None,
        };

        let white_parents = parents.iter().filter(|p| p.white.is_some()).count() as u32;
        let parent_white = parents.iter().filter_map(|p| p.white).max();
        pelt.white = pelt.roll_white(15 + 30 * white_parents, parent_white, rng);
        pelt.fix_tortie(rng);
        pelt
    }

    /// Roll white patches. Two-colour and calico coats always have white.
    fn roll_white(
        &self,
        chance: u32,
        near: Option<WhitePatches>,
        rng: &mut impl Rng,
    ) -> Option<WhitePatches> {
        let forced = matches!(self.kind, PeltKind::TwoColour | PeltKind::Calico);
        if !forced && !percent(chance, rng) {
            return None;
        }
        let coverage = match near {
            Some(w) if percent(60, rng) => {
                let idx = w.index() as i32 + rng.gen_range(-1..=1);
                WhitePatches::ORDER[idx.clamp(0, 4) as usize]
            }
            _ => pick(WHITE_WEIGHTS, rng).unwrap_or(WhitePatches::Little),
        };
        if self.kind == PeltKind::Calico {
            Some(coverage.clamp(WhitePatches::Mid, WhitePatches::Mostly))
        } else {
            Some(coverage)
        }
    }

    /// Make sure tortie markings are consistent with the coat kind.
    fn fix_tortie(&mut self, rng: &mut impl Rng) {
        if !self.kind.is_tortie() {
            self.tortie_base = None;
            self.tortie_colour = None;
            return;
        }
        if self.tortie_base.is_none() {
            self.tortie_base = Some(pick(KIND_WEIGHTS, rng).unwrap_or(PeltKind::SingleColour));
        }
        if self.colour.group() == ColourGroup::Ginger {
            self.colour = pick_uniform(
                &[PeltColour::Black, PeltColour::Brown, PeltColour::Grey, PeltColour::DarkBrown],
                rng,
            )
            .unwrap_or(PeltColour::Black);
        }
        if self.colour == PeltColour::White {
            self.colour = PeltColour::Black;
        }
        self.tortie_colour = pick_uniform(&PeltColour::in_group(ColourGroup::Ginger), rng);
    }

    pub fn add_scar(&mut self, scar: Scar) {
        if !self.scars.contains(&scar) {
            self.scars.push(scar);
        }
    }

    pub fn set_accessory(&mut self, accessory: Option<Accessory>) {
        self.accessory = accessory;
    }

    pub fn is_heterochromatic(&self) -> bool {
        self.eye_colour2.is_some()
    }

    /// Colour that dominates the coat for naming purposes.
    pub fn dominant_colour(&self) -> PeltColour {
        match self.white {
            Some(WhitePatches::Mostly | WhitePatches::Full) => PeltColour::White,
            _ => self.colour,
        }
    }

    /// Short English description of the coat.
    pub fn describe(&self) -> String {
        let length = if self.length == FurLength::Long {
            "long-furred "
        } else {
            ""
        };
        let mut text = if self.white == Some(WhitePatches::Full) {
            format!("{length}white cat")
        } else if let (true, Some(patch)) = (self.kind.is_tortie(), self.tortie_colour) {
            format!(
                "{length}{} and {} {}",
                self.colour.label(),
                patch.label(),
                self.kind.noun()
            )
        } else {
            format!("{length}{} {}", self.colour.label(), self.kind.noun())
        };
        if let Some(white) = self.white {
            if self.kind != PeltKind::Calico {
                text.push_str(white.suffix());
            }
        }
        if !self.scars.is_empty() {
            text.push_str(", scarred");
        }
        text
    }

    /// Describe the eyes ("green eyes", "one blue and one amber eye").
    pub fn describe_eyes(&self) -> String {
        match self.eye_colour2 {
            Some(other) => format!(
                "one {} and one {} eye",
                self.eye_colour.label(),
                other.label()
            ),
            None => format!("{} eyes", self.eye_colour.label()),
        }
    }
}

fn any_parent<'a>(parents: &[&'a Pelt], rng: &mut impl Rng) -> &'a Pelt {
    parents[rng.gen_range(0..parents.len())]
}

/// Expected kit appearance for a pair of parents, as percentages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OffspringForecast {
    pub samples: u32,
    pub colours: Vec<(PeltColour, f32)>,
    pub kinds: Vec<(PeltKind, f32)>,
    pub lengths: Vec<(FurLength, f32)>,
    pub eyes: Vec<(EyeColour, f32)>,
    /// Chance (0–100) of any white patches.
    pub white_chance: f32,
    /// Chance (0–100) of a tortie or calico coat.
    pub tortie_chance: f32,
}

/// Most common first; ties keep declaration order.
fn percentages<K: Copy + Ord>(counts: BTreeMap<K, u32>, total: u32) -> Vec<(K, f32)> {
    let mut counts: Vec<(K, u32)> = counts.into_iter().collect();
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
        .into_iter()
        .map(|(k, n)| (k, n as f32 * 100.0 / total.max(1) as f32))
        .collect()
}

/// Sample `samples` hypothetical kits and tally their appearance.
pub fn predict_offspring(a: &Pelt, b: &Pelt, samples: u32, rng: &mut impl Rng) -> OffspringForecast {
    let samples = samples.max(1);
    let mut colours = BTreeMap::new();
    let mut kinds = BTreeMap::new();
    let mut lengths = BTreeMap::new();
    let mut eyes = BTreeMap::new();
    let mut white = 0u32;
    let mut tortie = 0u32;

    for _ in 0..samples {
        let kit = Pelt::inherit(&[a, b], Gender::random(rng), rng);
        *colours.entry(kit.colour).or_insert(0) += 1;
        *kinds.entry(kit.kind).or_insert(0) += 1;
        *lengths.entry(kit.length).or_insert(0) += 1;
        *eyes.entry(kit.eye_colour).or_insert(0) += 1;
        if kit.white.is_some() {
            white += 1;
        }
        if kit.kind.is_tortie() {
            tortie += 1;
        }
    }

    OffspringForecast {
        samples,
        colours: percentages(colours, samples),
        kinds: percentages(kinds, samples),
        lengths: percentages(lengths, samples),
        eyes: percentages(eyes, samples),
        white_chance: white as f32 * 100.0 / samples as f32,
        tortie_chance: tortie as f32 * 100.0 / samples as f32,
    }
}
