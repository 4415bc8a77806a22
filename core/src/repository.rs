//! The single owner of everything loaded from a campaign directory.
//!
//! RULES:
//!   - Every file is loaded once, up front; builders only read.
//!   - A missing file is normal (campaigns run subsets of experiments).
//!   - A corrupt file is logged and treated as missing; it must not
//!     take the rest of the report down with it.

use crate::table::{ParetoFront, ResultTable};
use crate::types::{FrontKind, TableKind};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

pub struct ResultRepository {
    tables: HashMap<TableKind, ResultTable>,
    fronts: Vec<ParetoFront>,
}

impl ResultRepository {
    /// Load whichever result tables and pareto fronts exist under
    /// `results_dir`.
    pub fn open(results_dir: &Path) -> Self {
        let mut tables = HashMap::new();
        for kind in TableKind::ALL {
            let path = results_dir.join(kind.relative_path());
            if !path.exists() {
                log::debug!("{} not present, skipping", path.display());
                continue;
            }
            match ResultTable::load(kind, &path) {
                Ok(table) => {
                    log::info!("Loaded {} ({} rows)", kind.file_name(), table.rows.len());
                    tables.insert(kind, table);
                }
                Err(e) => {
                    log::warn!("{}: unreadable, treating as missing: {e}", path.display());
                }
            }
        }

        let fronts = load_fronts(&results_dir.join("pareto"));
        if !fronts.is_empty() {
            log::info!("Loaded {} pareto front(s)", fronts.len());
        }

        Self { tables, fronts }
    }

    pub fn table(&self, kind: TableKind) -> Option<&ResultTable> {
        self.tables.get(&kind)
    }

    /// Fronts of one family, in sorted filename order.
    pub fn fronts(&self, kind: FrontKind) -> Vec<&ParetoFront> {
        self.fronts.iter().filter(|f| f.kind == kind).collect()
    }

    #[cfg(test)]
    pub fn empty() -> Self {
        Self { tables: HashMap::new(), fronts: Vec::new() }
    }

    #[cfg(test)]
    pub fn with_table(mut self, table: ResultTable) -> Self {
        self.tables.insert(table.kind, table);
        self
    }

    #[cfg(test)]
    pub fn with_front(mut self, front: ParetoFront) -> Self {
        self.fronts.push(front);
        self
    }
}

/// Scan `pareto/` for `*_pareto.csv` files. Filenames are sorted so the
/// series order in the front figures is stable across runs. Families
/// outside the catalog (e.g. `cost_wip`) are ignored.
fn load_fronts(pareto_dir: &Path) -> Vec<ParetoFront> {
    let entries = match std::fs::read_dir(pareto_dir) {
        Ok(rd) => rd,
        Err(_) => {
            log::debug!("{} not present, skipping", pareto_dir.display());
            return Vec::new();
        }
    };

    let mut paths: Vec<PathBuf> = entries
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .collect();
    paths.sort();

    let mut fronts = Vec::new();
    for path in paths {
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if !name.ends_with("_pareto.csv") {
            continue;
        }
        let Some((instance, kind)) = front_identity(name) else {
            log::debug!("Ignoring pareto file outside the catalog: {name}");
            continue;
        };
        match ParetoFront::load(instance, kind, &path) {
            Ok(front) => {
                log::info!("Loaded {} ({} points)", name, front.points.len());
                fronts.push(front);
            }
            Err(e) => {
                log::warn!("{}: unreadable, treating as missing: {e}", path.display());
            }
        }
    }
    fronts
}

/// Split `<instance><suffix>` into the instance name and front family.
fn front_identity(file_name: &str) -> Option<(String, FrontKind)> {
    for kind in FrontKind::ALL {
        if let Some(instance) = file_name.strip_suffix(kind.file_suffix()) {
            return Some((instance.to_string(), kind));
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn front_identity_recognizes_both_families() {
        assert_eq!(
            front_identity("bom_25_cost_emissions_pareto.csv"),
            Some(("bom_25".to_string(), FrontKind::CostEmissions))
        );
        assert_eq!(
            front_identity("bom_25_cost_dio_pareto.csv"),
            Some(("bom_25".to_string(), FrontKind::CostDio))
        );
        assert_eq!(front_identity("bom_25_cost_wip_pareto.csv"), None);
    }
}
