//! Short "what is this cat thinking" lines.
//!
//! A thought is picked from small tables keyed on the cat's situation.
//! Templates may mention one other cat through the `{other}` placeholder;
//! the engine fills it in with [`fill_other`] or, when the cat knows no one,
//! asks for a thought without one.

use rand::Rng;

use crate::age::AgeGroup;
use crate::personality::Trait;
use crate::status::{Afterlife, Status};
use crate::weighted::percent;

pub const OTHER: &str = "{other}";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThoughtContext {
    pub status: Status,
    pub trait_kind: Trait,
    pub age: AgeGroup,
    pub grieving: bool,
    pub ill: bool,
    pub injured: bool,
    /// `None` while alive.
    pub afterlife: Option<Afterlife>,
    pub has_mentor: bool,
    /// There is another cat the thought could be about.
    pub knows_other: bool,
}

static STARCLAN: &[&str] = &[
    "Is watching over the Clan from StarClan",
    "Walks among the stars",
    "Visits {other} in a dream",
    "Hopes {other} is doing well",
];
static DARK_FOREST: &[&str] = &[
    "Prowls the shadows of the Dark Forest",
    "Still holds a grudge against {other}",
    "Whispers into the dreams of the living",
];
static UNKNOWN: &[&str] = &[
    "Wanders somewhere beyond the stars",
    "Wonders if anyone remembers them",
];
static GRIEF: &[&str] = &[
    "Is mourning {other}",
    "Can't stop thinking about {other}",
    "Sits alone at the edge of camp",
];
static ILL: &[&str] = &[
    "Is feeling unwell",
    "Is resting in the medicine den",
    "Hopes to feel better soon",
];
static INJURED: &[&str] = &[
    "Is nursing their wounds",
    "Is tired of being stuck in the medicine den",
];
static KIT: &[&str] = &[
    "Is pestering {other} for a story",
    "Is play-fighting with a moss ball",
    "Wonders what being an apprentice is like",
    "Is hiding from {other}",
];
static APPRENTICE: &[&str] = &[
    "Is practising the hunting crouch",
    "Is dreaming about their warrior name",
    "Is racing {other} to the training hollow",
];
static WITH_MENTOR: &[&str] = &["Is training hard with their mentor"];
static WITHOUT_MENTOR: &[&str] = &["Wishes they had a mentor"];
static WARRIOR: &[&str] = &[
    "Is on patrol",
    "Caught a plump vole",
    "Is sharing tongues with {other}",
    "Is guarding the camp entrance",
];
static MEDICINE: &[&str] = &[
    "Is sorting herbs",
    "Is wondering about a sign from StarClan",
    "Is checking on {other}'s wounds",
];
static MEDIATOR: &[&str] = &["Is settling a quarrel", "Is listening to {other}'s worries"];
static DEPUTY: &[&str] = &["Is organising the patrols", "Is keeping an eye on {other}"];
static LEADER: &[&str] = &["Is thinking about the Clan's future", "Is sharing a piece of prey with {other}"];
static ELDER: &[&str] = &[
    "Is telling stories to the kits",
    "Is napping in the sun",
    "Is complaining about the fresh-kill pile",
];
static OUTSIDE: &[&str] = &["Is wandering far from any Clan", "Is wondering what became of {other}"];
static KITTYPET: &[&str] = &["Is napping on a Twoleg's lap", "Is staring at a Clan cat through the fence"];
static FIERCE: &[&str] = &["Is glaring at {other}", "Is sharpening their claws"];
static PLAYFUL: &[&str] = &["Is chasing falling leaves", "Is pouncing on {other}'s tail"];
static CALM: &[&str] = &["Is gazing at the stars", "Is listening to the wind"];
static ANXIOUS: &[&str] = &["Wonders if the Clan likes them", "Is nervous around {other}"];
static GENERAL: &[&str] = &[
    "Is enjoying the weather",
    "Is grooming their pelt",
    "Is watching the clouds",
    "Is sharing prey with {other}",
];

fn status_table(ctx: &ThoughtContext) -> &'static [&'static str] {
    match ctx.status {
        s if s.is_kit() => KIT,
        s if s.is_apprentice() && s != Status::MedicineCatApprentice => APPRENTICE,
        Status::MedicineCat | Status::MedicineCatApprentice => MEDICINE,
        Status::Mediator => MEDIATOR,
        Status::Deputy => DEPUTY,
        Status::Leader => LEADER,
        Status::Elder => ELDER,
        Status::Kittypet => KITTYPET,
        s if s.is_outside() => OUTSIDE,
        _ => WARRIOR,
    }
}

fn trait_table(t: Trait) -> &'static [&'static str] {
    match t {
        Trait::Bloodthirsty | Trait::Vengeful | Trait::Fierce | Trait::Cold | Trait::Bullying => FIERCE,
        Trait::Playful | Trait::Childish | Trait::Bouncy | Trait::Noisy => PLAYFUL,
        Trait::Wise | Trait::Thoughtful | Trait::Calm | Trait::Quiet => CALM,
        Trait::Lonesome | Trait::Insecure | Trait::Nervous | Trait::Shy => ANXIOUS,
        _ => GENERAL,
    }
}

/// Candidate templates for this situation, most pressing first.
fn candidates(ctx: &ThoughtContext, rng: &mut impl Rng) -> Vec<&'static str> {
    if let Some(afterlife) = ctx.afterlife {
        return match afterlife {
            Afterlife::StarClan => STARCLAN,
            Afterlife::DarkForest => DARK_FOREST,
            Afterlife::UnknownResidence => UNKNOWN,
        }
        .to_vec();
    }
    if ctx.grieving && percent(70, rng) {
        return GRIEF.to_vec();
    }
    if (ctx.ill || ctx.injured) && percent(50, rng) {
        let mut out = Vec::new();
        if ctx.ill {
            out.extend_from_slice(ILL);
        }
        if ctx.injured {
            out.extend_from_slice(INJURED);
        }
        return out;
    }
    let mut out = status_table(ctx).to_vec();
    if ctx.status.is_apprentice() {
        out.extend_from_slice(if ctx.has_mentor { WITH_MENTOR } else { WITHOUT_MENTOR });
    }
    out.extend_from_slice(trait_table(ctx.trait_kind));
    out.extend_from_slice(GENERAL);
    out
}

/// Pick a thought template for the context. Templates mentioning another
/// cat are skipped when the cat knows no one.
pub fn pick_thought(ctx: &ThoughtContext, rng: &mut impl Rng) -> String {
    let mut pool = candidates(ctx, rng);
    if !ctx.knows_other {
        pool.retain(|t| !t.contains(OTHER));
    }
    if pool.is_empty() {
        pool.push(if ctx.afterlife.is_some() { "Rests peacefully" } else { "Is lost in thought" });
    }
    pool[rng.gen_range(0..pool.len())].to_string()
}

pub fn fill_other(thought: &str, other: &str) -> String {
    thought.replace(OTHER, other)
}
