use std::collections::HashMap;

use crate::building::Building;
use crate::hit_mask::HitMask;

/// A building whose overlay finished decoding. `I` is the platform image handle.
#[derive(Debug, Clone)]
pub struct RuntimeBuilding<I> {
    pub building: Building,
    pub overlay: I,
    pub mask: HitMask,
    pub is_selected: bool,
}

/// Terminal outcome of one overlay load.
#[derive(Debug, Clone)]
pub enum OverlayLoad<I> {
    Ready { overlay: I, mask: HitMask },
    Failed,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstallReport {
    pub installed: usize,
    pub failed: Vec<String>,
    pub duplicates: Vec<String>,
}

/// All runtime buildings, keyed by id and iterated in dataset order.
#[derive(Debug, Clone)]
pub struct BuildingScene<I> {
    order: Vec<String>,
    buildings: HashMap<String, RuntimeBuilding<I>>,
    ready: bool,
}

impl<I> Default for BuildingScene<I> {
    fn default() -> Self {
        Self {
            order: Vec::new(),
            buildings: HashMap::new(),
            ready: false,
        }
    }
}

impl<I> BuildingScene<I> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install the complete batch of overlay outcomes at once and mark the scene ready.
    /// Failed overlays are left out; a repeated id keeps its first occurrence.
    pub fn install(
        &mut self,
        batch: impl IntoIterator<Item = (Building, OverlayLoad<I>)>,
    ) -> InstallReport {
        let mut report = InstallReport::default();
        for (building, load) in batch {
            if self.buildings.contains_key(&building.id) {
                report.duplicates.push(building.id);
                continue;
            }
            match load {
                OverlayLoad::Ready { overlay, mask } => {
                    self.order.push(building.id.clone());
                    self.buildings.insert(
                        building.id.clone(),
                        RuntimeBuilding {
                            building,
                            overlay,
                            mask,
                            is_selected: false,
                        },
                    );
                    report.installed += 1;
                }
                OverlayLoad::Failed => report.failed.push(building.id),
            }
        }
        self.ready = true;
        report
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.buildings.contains_key(id)
    }

    pub fn get(&self, id: &str) -> Option<&RuntimeBuilding<I>> {
        self.buildings.get(id)
    }

    pub(crate) fn get_mut(&mut self, id: &str) -> Option<&mut RuntimeBuilding<I>> {
        self.buildings.get_mut(id)
    }

    /// Buildings in dataset order.
    pub fn iter(&self) -> impl Iterator<Item = &RuntimeBuilding<I>> {
        self.order.iter().filter_map(|id| self.buildings.get(id))
    }

    /// First building in dataset order whose silhouette covers the map point.
    pub fn hit_test(&self, map_x: f64, map_y: f64) -> Option<&str> {
        self.iter()
            .find(|rb| rb.mask.is_opaque_at(map_x, map_y))
            .map(|rb| rb.building.id.as_str())
    }
}
