//! In-memory catalog for exercising the orchestration layer.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use tokio::sync::Semaphore;

use pokedex_api::types::{
    ChainLink, DamageRelations, EvolutionDetail, FlavorText, Genus, ResourceLink, SpeciesRecord,
    TypeSlot,
};
use pokedex_api::{
    ApiError, CatalogSource, EntityRecord, EvolutionChain, ListingResponse, NamedResource,
    TypeRelations,
};
use pokedex_core::{EntityId, id_from_url};

pub(crate) const BASE: &str = "https://pokeapi.test";

const KNOWN: &[(&str, &[&str])] = &[
    ("bulbasaur", &["grass", "poison"]),
    ("ivysaur", &["grass", "poison"]),
    ("venusaur", &["grass", "poison"]),
    ("charmander", &["fire"]),
    ("charmeleon", &["fire"]),
    ("charizard", &["fire", "flying"]),
    ("squirtle", &["water"]),
    ("wartortle", &["water"]),
    ("blastoise", &["water"]),
];

fn type_id(name: &str) -> u32 {
    match name {
        "normal" => 1,
        "flying" => 3,
        "poison" => 4,
        "fire" => 10,
        "water" => 11,
        "grass" => 12,
        _ => 99,
    }
}

fn type_name(id: &str) -> &'static str {
    match id {
        "1" => "normal",
        "3" => "flying",
        "4" => "poison",
        "10" => "fire",
        "11" => "water",
        "12" => "grass",
        _ => "unknown",
    }
}

fn weak_to(type_name: &str) -> &'static [&'static str] {
    match type_name {
        "grass" => &["flying", "poison", "bug", "fire", "ice"],
        "poison" => &["ground", "psychic"],
        "fire" => &["ground", "rock", "water"],
        "flying" => &["rock", "electric", "ice"],
        "water" => &["grass", "electric"],
        _ => &["fighting"],
    }
}

fn named(name: &str, url: impl Into<String>) -> NamedResource {
    NamedResource {
        name: name.to_string(),
        url: url.into(),
    }
}

/// Catalog of `total` entities. Ids 1..=9 are the first nine real ones,
/// everything after is `mon-<id>` of type normal.
pub(crate) struct MockSource {
    total: u32,
    pub list_calls: AtomicUsize,
    pub entity_calls: AtomicUsize,
    pub species_calls: AtomicUsize,
    pub evolution_calls: AtomicUsize,
    pub type_calls: AtomicUsize,
    failures: Mutex<HashSet<String>>,
    gates: Mutex<HashMap<String, Arc<Semaphore>>>,
}

impl MockSource {
    pub fn new(total: u32) -> Self {
        Self {
            total,
            list_calls: AtomicUsize::new(0),
            entity_calls: AtomicUsize::new(0),
            species_calls: AtomicUsize::new(0),
            evolution_calls: AtomicUsize::new(0),
            type_calls: AtomicUsize::new(0),
            failures: Mutex::new(HashSet::new()),
            gates: Mutex::new(HashMap::new()),
        }
    }

    pub fn shared(total: u32) -> Arc<Self> {
        Arc::new(Self::new(total))
    }

    /// Make requests for `route` (e.g. `"species/1"`, `"type/4"`, `"list"`)
    /// fail with HTTP 500.
    pub fn fail(&self, route: &str) {
        self.failures.lock().unwrap().insert(route.to_string());
    }

    pub fn heal(&self, route: &str) {
        self.failures.lock().unwrap().remove(route);
    }

    /// Hold requests for `route` until [`open`](Self::open) is called.
    pub fn gate(&self, route: &str) {
        self.gates
            .lock()
            .unwrap()
            .insert(route.to_string(), Arc::new(Semaphore::new(0)));
    }

    pub fn open(&self, route: &str) {
        if let Some(gate) = self.gates.lock().unwrap().get(route) {
            gate.add_permits(1_000);
        }
    }

    pub fn calls(counter: &AtomicUsize) -> usize {
        counter.load(Ordering::SeqCst)
    }

    pub fn name_of(id: EntityId) -> String {
        KNOWN
            .get(id as usize - 1)
            .map(|(name, _)| name.to_string())
            .unwrap_or_else(|| format!("mon-{id}"))
    }

    fn types_of(id: EntityId) -> Vec<&'static str> {
        KNOWN
            .get(id as usize - 1)
            .map(|(_, types)| types.to_vec())
            .unwrap_or_else(|| vec!["normal"])
    }

    fn id_of(&self, segment: &str) -> Result<EntityId, ApiError> {
        if let Ok(id) = segment.parse::<EntityId>() {
            if (1..=self.total).contains(&id) {
                return Ok(id);
            }
        }
        (1..=self.total)
            .find(|&id| Self::name_of(id) == segment)
            .ok_or_else(|| ApiError::NotFound {
                url: segment.to_string(),
            })
    }

    async fn pass(&self, route: &str, counter: &AtomicUsize) -> Result<(), ApiError> {
        counter.fetch_add(1, Ordering::SeqCst);
        let gate = self.gates.lock().unwrap().get(route).cloned();
        if let Some(gate) = gate {
            let _permit = gate.acquire().await.map_err(|_| ApiError::Parse("gate closed".into()))?;
        }
        if self.failures.lock().unwrap().contains(route) {
            return Err(ApiError::Status {
                status: 500,
                url: format!("{BASE}/{route}"),
            });
        }
        Ok(())
    }

    fn record(id: EntityId) -> EntityRecord {
        EntityRecord {
            id,
            name: Self::name_of(id),
            height: 7,
            weight: 69,
            types: Self::types_of(id)
                .into_iter()
                .enumerate()
                .map(|(i, t)| TypeSlot {
                    slot: i as u8 + 1,
                    kind: named(t, format!("{BASE}/type/{}/", type_id(t))),
                })
                .collect(),
            stats: vec![],
            abilities: vec![],
            sprites: Default::default(),
            moves: vec![],
        }
    }
}

impl CatalogSource for MockSource {
    async fn list(&self, offset: u32, limit: u32) -> Result<ListingResponse, ApiError> {
        self.pass("list", &self.list_calls).await?;
        let end = offset.saturating_add(limit).min(self.total);
        Ok(ListingResponse {
            count: self.total,
            next: (end < self.total).then(|| format!("{BASE}/pokemon?offset={end}")),
            previous: (offset > 0).then(|| format!("{BASE}/pokemon?offset=0")),
            results: (offset..end)
                .map(|i| named(&Self::name_of(i + 1), format!("{BASE}/pokemon/{}/", i + 1)))
                .collect(),
        })
    }

    async fn entity(&self, id: EntityId) -> Result<EntityRecord, ApiError> {
        self.pass(&format!("pokemon/{id}"), &self.entity_calls)
            .await?;
        let id = self.id_of(&id.to_string())?;
        Ok(Self::record(id))
    }

    async fn entity_at(&self, url: &str) -> Result<EntityRecord, ApiError> {
        let segment = id_from_url(url).unwrap_or_default().to_string();
        let id = self.id_of(&segment)?;
        self.entity(id).await
    }

    async fn species(&self, id: EntityId) -> Result<SpeciesRecord, ApiError> {
        self.pass(&format!("species/{id}"), &self.species_calls)
            .await?;
        let id = self.id_of(&id.to_string())?;
        let chain = (id - 1) / 3 + 1;
        Ok(SpeciesRecord {
            flavor_text_entries: vec![
                FlavorText {
                    flavor_text: format!("Texte sur\n{}.", Self::name_of(id)),
                    language: named("fr", ""),
                },
                FlavorText {
                    flavor_text: format!("About\u{000C}{}.", Self::name_of(id)),
                    language: named("en", ""),
                },
            ],
            habitat: (id <= 9).then(|| named("grassland", "")),
            evolution_chain: Some(ResourceLink {
                url: format!("{BASE}/evolution-chain/{chain}/"),
            }),
            genera: vec![Genus {
                genus: "Seed Pokémon".to_string(),
                language: named("en", ""),
            }],
        })
    }

    async fn evolution_chain(&self, url: &str) -> Result<EvolutionChain, ApiError> {
        let chain: u32 = id_from_url(url)
            .and_then(|s| s.parse().ok())
            .ok_or_else(|| ApiError::InvalidId(url.to_string()))?;
        self.pass(&format!("evolution/{chain}"), &self.evolution_calls)
            .await?;
        let first = (chain - 1) * 3 + 1;
        let link = |id: u32, level: Option<u32>, next: Vec<ChainLink>| ChainLink {
            species: named(&Self::name_of(id), format!("{BASE}/pokemon-species/{id}/")),
            evolution_details: level
                .map(|l| {
                    vec![EvolutionDetail {
                        min_level: Some(l),
                        item: None,
                    }]
                })
                .unwrap_or_default(),
            evolves_to: next,
        };
        Ok(EvolutionChain {
            chain: link(
                first,
                None,
                vec![link(first + 1, Some(16), vec![link(first + 2, Some(32), vec![])])],
            ),
        })
    }

    async fn type_relations(&self, url: &str) -> Result<TypeRelations, ApiError> {
        let id = id_from_url(url).unwrap_or_default().to_string();
        self.pass(&format!("type/{id}"), &self.type_calls).await?;
        let name = type_name(&id);
        Ok(TypeRelations {
            name: name.to_string(),
            damage_relations: DamageRelations {
                double_damage_from: weak_to(name).iter().map(|t| named(t, "")).collect(),
                ..Default::default()
            },
        })
    }

    fn artwork_url(&self, id: EntityId) -> String {
        format!("https://img.test/{id}.png")
    }
}
