//! Parent-before-child creation for items that reference each other by name
//!
//! Parents are created first and their assigned ids are recorded in a
//! [`ParentIndex`]; a child is only sent once its parent's id is known.
//! A child whose parent is missing fails without a remote call.

use std::collections::{HashMap, HashSet};
use std::future::Future;
use tracing::{info, warn};

use super::batch::{BatchExecutor, BatchRun, ItemOutcome};
use super::config::ResolveStrategy;
use super::core::{BatchReport, HierarchicalItem, MigrateError, Result};

/// Name to assigned-id map, alive for one resolver run
#[derive(Debug)]
pub struct ParentIndex<Id> {
    ids: HashMap<String, Id>,
}

impl<Id: Clone> ParentIndex<Id> {
    pub fn new() -> Self {
        Self {
            ids: HashMap::new(),
        }
    }

    pub fn insert(&mut self, name: impl Into<String>, id: Id) {
        self.ids.insert(name.into(), id);
    }

    pub fn get(&self, name: &str) -> Option<Id> {
        self.ids.get(name).cloned()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

impl<Id: Clone> Default for ParentIndex<Id> {
    fn default() -> Self {
        Self::new()
    }
}

pub struct DependencyResolver<'e> {
    executor: &'e BatchExecutor,
    strategy: ResolveStrategy,
}

impl<'e> DependencyResolver<'e> {
    pub fn new(executor: &'e BatchExecutor, strategy: ResolveStrategy) -> Self {
        Self { executor, strategy }
    }

    /// Create every item, parents first
    ///
    /// `create` returns the id the remote system assigned, if any. Only the
    /// topological strategy can fail as a whole (on a reference cycle).
    pub async fn create_all<T, F, Fut>(
        &self,
        label: &str,
        items: Vec<T>,
        mut create: F,
    ) -> Result<BatchReport>
    where
        T: HierarchicalItem,
        F: FnMut(T) -> Fut,
        Fut: Future<Output = Result<Option<T::Id>>>,
    {
        let mut run = self.executor.start(label);
        let mut index = ParentIndex::new();

        match self.strategy {
            ResolveStrategy::TwoPass => {
                let (roots, children): (Vec<T>, Vec<T>) = items
                    .into_iter()
                    .partition(|item| item.parent_reference_name().is_none());

                info!(batch = label, count = roots.len(), "Creating top-level items");
                for item in roots {
                    create_one(&mut run, &mut index, item, &mut create).await;
                }

                info!(batch = label, count = children.len(), "Creating child items");
                for item in children {
                    create_one(&mut run, &mut index, item, &mut create).await;
                }
            }
            ResolveStrategy::Topological => {
                let ordered = topological_order(items)?;
                for item in ordered {
                    create_one(&mut run, &mut index, item, &mut create).await;
                }
            }
        }

        Ok(run.finish())
    }
}

async fn create_one<T, F, Fut>(
    run: &mut BatchRun<'_>,
    index: &mut ParentIndex<T::Id>,
    mut item: T,
    create: &mut F,
) where
    T: HierarchicalItem,
    F: FnMut(T) -> Fut,
    Fut: Future<Output = Result<Option<T::Id>>>,
{
    if let Some(parent) = item.parent_reference_name().map(str::to_string) {
        match index.get(&parent) {
            Some(parent_id) => item.attach_parent(parent_id),
            None => {
                let name = item.name().unwrap_or_default().to_string();
                run.fail_unattempted(&item, MigrateError::ParentNotFound { name, parent });
                return;
            }
        }
    }

    let name = item.name().map(str::to_string);
    match run.process(item, None, |_, item| create(item)).await {
        ItemOutcome::Succeeded(Some(id)) => {
            if let Some(name) = name {
                index.insert(name, id);
            }
        }
        ItemOutcome::Succeeded(None) => {
            warn!(
                batch = run.label(),
                name = name.as_deref().unwrap_or("-"),
                "Created without an id; children cannot reference it"
            );
        }
        _ => {}
    }
}

/// Order items so every parent precedes its children, keeping the original
/// order within each depth
///
/// References to names outside `items` are treated as roots here; they fail
/// later when the parent lookup misses.
pub fn topological_order<T: HierarchicalItem>(items: Vec<T>) -> Result<Vec<T>> {
    let depths = {
        let mut by_name: HashMap<&str, usize> = HashMap::new();
        for (i, item) in items.iter().enumerate() {
            if let Some(name) = item.name() {
                by_name.entry(name).or_insert(i);
            }
        }

        let mut depth: Vec<Option<usize>> = vec![None; items.len()];
        for start in 0..items.len() {
            if depth[start].is_some() {
                continue;
            }

            let mut path: Vec<usize> = Vec::new();
            let mut on_path: HashSet<usize> = HashSet::new();
            let mut current = start;
            let base = loop {
                if let Some(d) = depth[current] {
                    break d + 1;
                }
                if !on_path.insert(current) {
                    let from = path.iter().position(|&n| n == current).unwrap_or(0);
                    let names = path[from..]
                        .iter()
                        .map(|&n| items[n].name().unwrap_or_default().to_string())
                        .collect();
                    return Err(MigrateError::DependencyCycle { names });
                }
                path.push(current);

                match items[current]
                    .parent_reference_name()
                    .and_then(|parent| by_name.get(parent))
                {
                    Some(&parent) => current = parent,
                    None => break 0,
                }
            };

            for (offset, &node) in path.iter().rev().enumerate() {
                depth[node] = Some(base + offset);
            }
        }
        depth
    };

    let mut order: Vec<usize> = (0..items.len()).collect();
    order.sort_by_key(|&i| (depths[i].unwrap_or(0), i));

    let mut slots: Vec<Option<T>> = items.into_iter().map(Some).collect();
    Ok(order.into_iter().filter_map(|i| slots[i].take()).collect())
}
