use crate::model::{DatasetRecord, Entity, Evolution, Stage};
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DataIntegrityError {
    #[error("Duplicate entity id: {0}")]
    DuplicateId(String),
    #[error("Entity {id} has unknown stage {stage:?}")]
    UnknownStage { id: String, stage: String },
}

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("Invalid data file: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Integrity(#[from] DataIntegrityError),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown root entity: {0}")]
pub struct UnknownRootError(pub String);

/// Non-fatal problem found while loading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DanglingEdgeWarning {
    UnknownSource { edge_index: usize, id: String },
    UnknownTarget { edge_index: usize, id: String },
}

impl std::fmt::Display for DanglingEdgeWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownSource { edge_index, id } => {
                write!(f, "evolution #{} starts at unknown entity {}", edge_index, id)
            }
            Self::UnknownTarget { edge_index, id } => {
                write!(f, "evolution #{} ends at unknown entity {}", edge_index, id)
            }
        }
    }
}

/// Immutable entity list plus evolution edges, indexed for lookup.
#[derive(Debug, Clone)]
pub struct EvolutionStore {
    entities: Vec<Entity>,
    evolutions: Vec<Evolution>,
    index: HashMap<String, usize>,
    /// Entity id -> indices of evolutions leaving it, in edge-list order
    outgoing: HashMap<String, Vec<usize>>,
    /// Entity id -> indices of evolutions entering it, in edge-list order
    incoming: HashMap<String, Vec<usize>>,
    warnings: Vec<DanglingEdgeWarning>,
}

impl EvolutionStore {
    pub fn new(
        entities: Vec<Entity>,
        evolutions: Vec<Evolution>,
    ) -> Result<Self, DataIntegrityError> {
        let mut index = HashMap::with_capacity(entities.len());
        for (i, entity) in entities.iter().enumerate() {
            if index.insert(entity.id.clone(), i).is_some() {
                return Err(DataIntegrityError::DuplicateId(entity.id.clone()));
            }
        }

        let mut outgoing: HashMap<String, Vec<usize>> = HashMap::new();
        let mut incoming: HashMap<String, Vec<usize>> = HashMap::new();
        let mut warnings = Vec::new();

        for (idx, evo) in evolutions.iter().enumerate() {
            let mut dangling = false;
            if !index.contains_key(&evo.from) {
                warnings.push(DanglingEdgeWarning::UnknownSource {
                    edge_index: idx,
                    id: evo.from.clone(),
                });
                dangling = true;
            }
            if !index.contains_key(&evo.to) {
                warnings.push(DanglingEdgeWarning::UnknownTarget {
                    edge_index: idx,
                    id: evo.to.clone(),
                });
                dangling = true;
            }
            if dangling {
                continue;
            }
            outgoing.entry(evo.from.clone()).or_default().push(idx);
            incoming.entry(evo.to.clone()).or_default().push(idx);
        }

        for warning in &warnings {
            log::warn!("Skipping dangling {}", warning);
        }

        Ok(Self {
            entities,
            evolutions,
            index,
            outgoing,
            incoming,
            warnings,
        })
    }

    /// Load from a JSON data file.
    pub fn from_json(source: &str) -> Result<Self, LoadError> {
        let record: DatasetRecord = serde_json::from_str(source)?;
        Ok(Self::from_record(record)?)
    }

    pub fn from_record(record: DatasetRecord) -> Result<Self, DataIntegrityError> {
        let entities = record
            .entities
            .into_iter()
            .map(|r| {
                let id = r.id.unwrap_or_else(|| Entity::derive_id(&r.name));
                let stage = Stage::from_str(&r.stage).ok_or_else(|| {
                    DataIntegrityError::UnknownStage {
                        id: id.clone(),
                        stage: r.stage.clone(),
                    }
                })?;
                Ok(Entity {
                    id,
                    name: r.name,
                    stage,
                    image: r.image,
                    type_tags: r.type_tags,
                    description: r.description,
                    exclusive: r.exclusive,
                    stats: r.stats,
                })
            })
            .collect::<Result<Vec<_>, DataIntegrityError>>()?;

        Self::new(entities, record.evolutions)
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    /// Every evolution, including dangling ones, in data order.
    pub fn evolutions(&self) -> &[Evolution] {
        &self.evolutions
    }

    pub fn warnings(&self) -> &[DanglingEdgeWarning] {
        &self.warnings
    }

    pub fn get(&self, id: &str) -> Option<&Entity> {
        self.index.get(id).map(|&i| &self.entities[i])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Look up a root entity, failing when it is not in the data.
    pub fn require(&self, id: &str) -> Result<&Entity, UnknownRootError> {
        self.get(id).ok_or_else(|| UnknownRootError(id.to_string()))
    }

    /// Whether both endpoints of the evolution resolve to entities.
    pub fn is_resolved(&self, edge_index: usize) -> bool {
        self.evolutions
            .get(edge_index)
            .is_some_and(|e| self.contains(&e.from) && self.contains(&e.to))
    }

    /// Indices of resolved evolutions leaving `id`, in edge-list order.
    pub fn edges_from(&self, id: &str) -> &[usize] {
        self.outgoing.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Indices of resolved evolutions entering `id`, in edge-list order.
    pub fn edges_to(&self, id: &str) -> &[usize] {
        self.incoming.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn evolution(&self, edge_index: usize) -> &Evolution {
        &self.evolutions[edge_index]
    }

    /// Direct children of `id`, deduplicated, in edge-list order.
    pub fn children(&self, id: &str) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.edges_from(id)
            .iter()
            .map(|&i| self.evolutions[i].to.as_str())
            .filter(|child| seen.insert(*child))
            .collect()
    }

    /// Direct parents of `id`, deduplicated, in edge-list order.
    pub fn parents(&self, id: &str) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.edges_to(id)
            .iter()
            .map(|&i| self.evolutions[i].from.as_str())
            .filter(|parent| seen.insert(*parent))
            .collect()
    }

    /// Initial focal entity: the first entity of the lowest stage present,
    /// in data order.
    pub fn default_root(&self) -> Option<&Entity> {
        let lowest = self.entities.iter().map(|e| e.stage).min()?;
        self.entities.iter().find(|e| e.stage == lowest)
    }
}
