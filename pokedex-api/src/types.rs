use serde::Deserialize;

use pokedex_core::{EntityId, clean_flavor_text};

/// `{name, url}` pair the API uses to reference other resources.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NamedResource {
    pub name: String,
    #[serde(default)]
    pub url: String,
}

/// Response of the listing endpoint (`/pokemon?offset=..&limit=..`).
#[derive(Debug, Clone, Deserialize)]
pub struct ListingResponse {
    pub count: u32,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub previous: Option<String>,
    #[serde(default)]
    pub results: Vec<NamedResource>,
}

/// Full entity record from `/pokemon/{id}`.
#[derive(Debug, Clone, Deserialize)]
pub struct EntityRecord {
    pub id: EntityId,
    pub name: String,
    #[serde(default)]
    pub height: u32,
    #[serde(default)]
    pub weight: u32,
    #[serde(default)]
    pub types: Vec<TypeSlot>,
    #[serde(default)]
    pub stats: Vec<StatValue>,
    #[serde(default)]
    pub abilities: Vec<AbilitySlot>,
    #[serde(default)]
    pub sprites: Sprites,
    #[serde(default)]
    pub moves: Vec<MoveSlot>,
}

impl EntityRecord {
    /// Type names in slot order.
    pub fn type_names(&self) -> Vec<String> {
        self.types.iter().map(|t| t.kind.name.clone()).collect()
    }

    /// Type references for the first `n` slots.
    pub fn leading_types(&self, n: usize) -> impl Iterator<Item = &NamedResource> {
        self.types.iter().take(n).map(|t| &t.kind)
    }

    /// Official artwork URL as embedded in the record, if present.
    pub fn official_artwork(&self) -> Option<&str> {
        self.sprites
            .other
            .as_ref()
            .and_then(|o| o.official_artwork.as_ref())
            .and_then(|s| s.front_default.as_deref())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TypeSlot {
    #[serde(default)]
    pub slot: u8,
    #[serde(rename = "type")]
    pub kind: NamedResource,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StatValue {
    pub base_stat: u32,
    pub stat: NamedResource,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AbilitySlot {
    pub ability: NamedResource,
    #[serde(default)]
    pub is_hidden: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MoveSlot {
    #[serde(rename = "move")]
    pub move_ref: NamedResource,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Sprites {
    #[serde(default)]
    pub front_default: Option<String>,
    #[serde(default)]
    pub back_default: Option<String>,
    #[serde(default)]
    pub other: Option<OtherSprites>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OtherSprites {
    #[serde(rename = "official-artwork", default)]
    pub official_artwork: Option<SpriteRef>,
    #[serde(default)]
    pub dream_world: Option<SpriteRef>,
    #[serde(default)]
    pub home: Option<SpriteRef>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SpriteRef {
    #[serde(default)]
    pub front_default: Option<String>,
}

/// Species metadata from `/pokemon-species/{id}`.
#[derive(Debug, Clone, Deserialize)]
pub struct SpeciesRecord {
    #[serde(default)]
    pub flavor_text_entries: Vec<FlavorText>,
    #[serde(default)]
    pub habitat: Option<NamedResource>,
    #[serde(default)]
    pub evolution_chain: Option<ResourceLink>,
    #[serde(default)]
    pub genera: Vec<Genus>,
}

impl SpeciesRecord {
    /// Flavor text in `language`, falling back to the first entry in any
    /// language. Control characters are replaced by spaces.
    pub fn description_for(&self, language: &str) -> Option<String> {
        self.flavor_text_entries
            .iter()
            .find(|e| e.language.name == language)
            .or_else(|| self.flavor_text_entries.first())
            .map(|e| clean_flavor_text(&e.flavor_text))
    }

    /// Genus (e.g. "Seed Pokémon") in `language`, falling back to the first.
    pub fn genus_for(&self, language: &str) -> Option<&str> {
        self.genera
            .iter()
            .find(|g| g.language.name == language)
            .or_else(|| self.genera.first())
            .map(|g| g.genus.as_str())
    }

    pub fn evolution_chain_url(&self) -> Option<&str> {
        self.evolution_chain
            .as_ref()
            .map(|l| l.url.as_str())
            .filter(|u| !u.is_empty())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct FlavorText {
    pub flavor_text: String,
    pub language: NamedResource,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Genus {
    pub genus: String,
    pub language: NamedResource,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResourceLink {
    pub url: String,
}

/// Evolution chain, fetched from the URL embedded in the species record.
#[derive(Debug, Clone, Deserialize)]
pub struct EvolutionChain {
    pub chain: ChainLink,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChainLink {
    pub species: NamedResource,
    #[serde(default)]
    pub evolution_details: Vec<EvolutionDetail>,
    #[serde(default)]
    pub evolves_to: Vec<ChainLink>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EvolutionDetail {
    #[serde(default)]
    pub min_level: Option<u32>,
    #[serde(default)]
    pub item: Option<NamedResource>,
}

/// One flattened step of an evolution chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvolutionStage {
    pub name: String,
    pub species_url: String,
    /// 0 for the base form, 1 for its evolutions, and so on.
    pub depth: usize,
    pub min_level: Option<u32>,
    pub item: Option<String>,
}

impl EvolutionChain {
    /// Depth-first flattening, base form first. Branches are listed in
    /// API order and each evolution is followed by its own evolutions.
    pub fn stages(&self) -> Vec<EvolutionStage> {
        let mut out = Vec::new();
        collect_stages(&self.chain, 0, &mut out);
        out
    }
}

fn collect_stages(link: &ChainLink, depth: usize, out: &mut Vec<EvolutionStage>) {
    let detail = link.evolution_details.first();
    out.push(EvolutionStage {
        name: link.species.name.clone(),
        species_url: link.species.url.clone(),
        depth,
        min_level: detail.and_then(|d| d.min_level),
        item: detail.and_then(|d| d.item.as_ref()).map(|i| i.name.clone()),
    });
    for next in &link.evolves_to {
        collect_stages(next, depth + 1, out);
    }
}

/// Damage relations for one type, from `/type/{id}`.
#[derive(Debug, Clone, Deserialize)]
pub struct TypeRelations {
    #[serde(default)]
    pub name: String,
    pub damage_relations: DamageRelations,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DamageRelations {
    #[serde(default)]
    pub double_damage_from: Vec<NamedResource>,
    #[serde(default)]
    pub half_damage_from: Vec<NamedResource>,
    #[serde(default)]
    pub no_damage_from: Vec<NamedResource>,
    #[serde(default)]
    pub double_damage_to: Vec<NamedResource>,
    #[serde(default)]
    pub half_damage_to: Vec<NamedResource>,
    #[serde(default)]
    pub no_damage_to: Vec<NamedResource>,
}

#[cfg(test)]
#[path = "tests/types_tests.rs"]
mod tests;
