//! Save/Load functionality for persisting Clan state
//!
//! Uses bincode for compact binary saves and serde_json for human-readable
//! exports. Cats are flattened into [`CatRecord`]s then respawned on load;
//! the id registry and family trees are rebuilt from the records.
//!
//! Faded cats live in a separate [`FadedArchive`] that can be written next
//! to the save as `<clan>_faded.json`.

use std::collections::BTreeMap;
use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use clangen_logic::config::ClanConfig;
use clangen_logic::health::HerbStore;
use clangen_logic::relation::{Bond, RelationshipStats};
use clangen_logic::status::{Afterlife, Status};
use serde::{Deserialize, Serialize};

use crate::clan::{Clan, MoonState};
use crate::components::*;
use crate::error::SaveError;
use crate::events::MoonLog;

/// Version number for save file format (increment when format changes)
pub const SAVE_VERSION: u32 = 2;

/// Everything known about one cat, flattened out of the ECS.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatRecord {
    pub id: CatId,
    pub name: Name,
    /// Name as shown for the cat's current status
    pub display_name: String,
    pub gender: Gender,
    pub gender_align: GenderAlign,
    pub moons: u32,
    pub status: Status,
    pub leader_lives: u8,
    pub pelt: Pelt,
    pub personality: Personality,
    pub skills: CatSkills,
    pub conditions: Conditions,
    pub lineage: Lineage,
    pub life: Life,
    pub alters: Option<AlterSystem>,
    pub pregnancy: Option<Pregnancy>,
    pub thought: String,
    /// This cat's feelings towards others
    pub relationships: Vec<(CatId, RelationshipStats)>,
}

impl CatRecord {
    pub fn is_alive(&self) -> bool {
        self.life.is_alive()
    }
}

/// Serializable snapshot of the Clan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveData {
    /// Save format version
    pub version: u32,
    pub seed: u64,
    pub moon: u32,
    pub next_id: u32,
    pub config: ClanConfig,
    pub cats: Vec<CatRecord>,
    /// Bonds as `(smaller id, larger id, bond)`
    pub bonds: Vec<(CatId, CatId, Bond)>,
    pub herbs: HerbStore,
    pub log: MoonLog,
    pub faded: FadedArchive,
    /// Deaths, trauma and mediations not yet handled by the next moon
    #[serde(default)]
    pub pending: MoonState,
}

/// Flatten one cat. `None` when the id is not in the world.
pub fn cat_record(clan: &Clan, id: CatId) -> Option<CatRecord> {
    let entity = clan.entity(id).ok()?;
    let entity_ref = clan.world.entity(entity).ok()?;

    let identity = *entity_ref.get::<&Identity>()?;
    let name = (*entity_ref.get::<&Name>()?).clone();
    let role = *entity_ref.get::<&Role>()?;

    Some(CatRecord {
        id,
        display_name: name.display(role.status),
        name,
        gender: identity.gender,
        gender_align: identity.gender_align,
        moons: entity_ref.get::<&Age>().map_or(0, |a| a.moons),
        status: role.status,
        leader_lives: role.leader_lives,
        pelt: (*entity_ref.get::<&Pelt>()?).clone(),
        personality: *entity_ref.get::<&Personality>()?,
        skills: entity_ref.get::<&CatSkills>().map(|s| (*s).clone()).unwrap_or_default(),
        conditions: entity_ref.get::<&Conditions>().map(|c| (*c).clone()).unwrap_or_default(),
        lineage: entity_ref.get::<&Lineage>().map(|l| (*l).clone()).unwrap_or_default(),
        life: entity_ref.get::<&Life>().map(|l| (*l).clone()).unwrap_or_default(),
        alters: entity_ref.get::<&AlterSystem>().map(|a| (*a).clone()),
        pregnancy: entity_ref.get::<&Pregnancy>().map(|p| *p),
        thought: entity_ref.get::<&Thought>().map(|t| t.text.clone()).unwrap_or_default(),
        relationships: clan.relationships.known_by(id).map(|(other, s)| (other, *s)).collect(),
    })
}

/// Spawn a cat from its record and register it with the Clan
fn spawn_cat(clan: &mut Clan, record: CatRecord) {
    let entity = clan.world.spawn((
        Cat,
        Identity {
            id: record.id,
            gender: record.gender,
            gender_align: record.gender_align,
        },
        record.name,
        Age::new(record.moons),
        Role {
            status: record.status,
            leader_lives: record.leader_lives,
        },
        record.pelt,
        record.personality,
        record.skills,
        record.conditions,
        record.lineage.clone(),
        record.life,
        Thought::new(record.thought),
    ));

    if let Some(c) = record.alters {
        let _ = clan.world.insert_one(entity, c);
    }
    if let Some(c) = record.pregnancy {
        let _ = clan.world.insert_one(entity, c);
    }

    clan.register(record.id, entity);
    clan.inheritance.register(record.id, &record.lineage.blood_parents());
    for &parent in &record.lineage.adoptive_parents {
        clan.inheritance.add_adoptive(record.id, parent);
    }
    for (other, stats) in record.relationships {
        clan.relationships.insert(record.id, other, stats);
    }
}

/// Snapshot the whole Clan
pub fn snapshot(clan: &Clan, seed: u64) -> SaveData {
    SaveData {
        version: SAVE_VERSION,
        seed,
        moon: clan.moon,
        next_id: clan.next_id,
        config: clan.config.clone(),
        cats: clan.ids().into_iter().filter_map(|id| cat_record(clan, id)).collect(),
        bonds: clan.relationships.bonds(),
        herbs: clan.herbs.clone(),
        log: clan.log.clone(),
        faded: clan.faded.clone(),
        pending: clan.moon_state.clone(),
    }
}

/// Rebuild a Clan from a snapshot. Returns the Clan and its seed.
pub fn restore(data: SaveData) -> Result<(Clan, u64), SaveError> {
    if data.version != SAVE_VERSION {
        return Err(SaveError::VersionMismatch {
            expected: SAVE_VERSION,
            found: data.version,
        });
    }

    let mut clan = Clan::new(data.config);
    clan.moon = data.moon;
    clan.herbs = data.herbs;
    clan.log = data.log;
    clan.moon_state = data.pending;

    for faded in data.faded.iter() {
        register_faded(&mut clan, faded);
    }
    clan.faded = data.faded;

    for record in data.cats {
        spawn_cat(&mut clan, record);
    }
    for (a, b, bond) in data.bonds {
        clan.relationships
            .set_bond(a, b, bond)
            .map_err(|e| SaveError::Corrupt(e.to_string()))?;
    }
    // Older saves may carry alter systems with a stale host name.
    for id in clan.ids() {
        if let Some(host) = clan.read::<Name>(id).map(|n| n.full()) {
            clan.with_mut::<AlterSystem, _>(id, |sys| sys.normalise(&host));
        }
    }
    clan.next_id = clan.next_id.max(data.next_id);
    Ok((clan, data.seed))
}

fn register_faded(clan: &mut Clan, faded: &FadedCat) {
    clan.inheritance.register(faded.id, &faded.parents);
    for &parent in &faded.adoptive_parents {
        clan.inheritance.add_adoptive(faded.id, parent);
    }
    clan.next_id = clan.next_id.max(faded.id.0 + 1);
}

/// Save the Clan to a writer
pub fn save_clan<W: Write>(writer: W, clan: &Clan, seed: u64) -> Result<(), SaveError> {
    bincode::serialize_into(writer, &snapshot(clan, seed))?;
    Ok(())
}

/// Load a Clan from a reader
pub fn load_clan<R: Read>(reader: R) -> Result<(Clan, u64), SaveError> {
    let save_data: SaveData = bincode::deserialize_from(reader)?;
    restore(save_data)
}

pub fn export_clan_json(clan: &Clan, seed: u64) -> Result<String, SaveError> {
    Ok(serde_json::to_string_pretty(&snapshot(clan, seed))?)
}

pub fn import_clan_json(json: &str) -> Result<(Clan, u64), SaveError> {
    let save_data: SaveData = serde_json::from_str(json)?;
    restore(save_data)
}

// ── Faded cats ─────────────────────────────────────────────────────────

/// What is remembered of a cat after it leaves the world.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FadedCat {
    pub id: CatId,
    pub name: Name,
    pub display_name: String,
    pub status: Status,
    pub gender: Gender,
    pub moons: u32,
    pub parents: Vec<CatId>,
    pub adoptive_parents: Vec<CatId>,
    pub cause: String,
    pub afterlife: Afterlife,
    pub moons_dead: u32,
    pub faded_moon: u32,
}

/// Faded cats by id
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FadedArchive {
    cats: BTreeMap<CatId, FadedCat>,
}

impl FadedArchive {
    pub fn insert(&mut self, cat: FadedCat) {
        self.cats.insert(cat.id, cat);
    }

    pub fn get(&self, id: CatId) -> Option<&FadedCat> {
        self.cats.get(&id)
    }

    pub fn contains(&self, id: CatId) -> bool {
        self.cats.contains_key(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FadedCat> {
        self.cats.values()
    }

    pub fn len(&self) -> usize {
        self.cats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cats.is_empty()
    }

    /// Merge another archive in. Returns how many cats were new.
    pub fn merge(&mut self, other: FadedArchive) -> usize {
        let before = self.cats.len();
        self.cats.extend(other.cats);
        self.cats.len() - before
    }

    /// Archive file for a Clan, e.g. `thunder_faded.json`
    pub fn file_name(clan_name: &str) -> String {
        format!("{}_faded.json", clan_name.to_lowercase())
    }

    pub fn path_in(dir: &Path, clan_name: &str) -> PathBuf {
        dir.join(Self::file_name(clan_name))
    }

    pub fn to_json(&self) -> Result<String, SaveError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, SaveError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn save(&self, path: &Path) -> Result<(), SaveError> {
        fs::write(path, self.to_json()?)?;
        Ok(())
    }

    /// Load an archive. A missing file is an empty archive.
    pub fn load(path: &Path) -> Result<Self, SaveError> {
        match fs::read_to_string(path) {
            Ok(json) => Self::from_json(&json),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Bring faded cats from an archive into the Clan's family trees.
pub fn merge_faded(clan: &mut Clan, archive: FadedArchive) -> usize {
    for faded in archive.iter() {
        register_faded(clan, faded);
    }
    clan.faded.merge(archive)
}
