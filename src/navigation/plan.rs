use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::catalog::{Catalog, CategoryDefinition};

/// `(category_index, question_index)` into a [`WizardPlan`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NavigationPosition {
    pub category_index: usize,
    pub question_index: usize,
}

impl NavigationPosition {
    pub const fn new(category_index: usize, question_index: usize) -> Self {
        Self {
            category_index,
            question_index,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedCategory {
    pub category: CategoryDefinition,
    /// Question ids sorted by `(order, id)`.
    pub question_ids: Vec<u32>,
}

/// Categories and questions applicable to one job type, in display order.
///
/// Categories are ordered by the smallest `order` among their questions, ties
/// keeping catalog order; questions by `(order, id)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WizardPlan {
    job_type: String,
    categories: Vec<PlannedCategory>,
}

impl WizardPlan {
    pub fn build(catalog: &Catalog, job_type: &str) -> Self {
        let mut grouped: BTreeMap<u32, Vec<(i64, u32)>> = BTreeMap::new();
        for question in catalog
            .questions
            .iter()
            .filter(|question| question.job_type == job_type)
        {
            grouped
                .entry(question.category)
                .or_default()
                .push((question.order, question.id));
        }

        let mut planned: Vec<(i64, PlannedCategory)> = catalog
            .categories
            .iter()
            .filter(|category| category.job_type == job_type)
            .filter_map(|category| {
                let mut members = grouped.get(&category.id)?.clone();
                members.sort();
                let min_order = members.first()?.0;
                Some((
                    min_order,
                    PlannedCategory {
                        category: category.clone(),
                        question_ids: members.into_iter().map(|(_, id)| id).collect(),
                    },
                ))
            })
            .collect();
        // Stable: equal minimum orders keep catalog order.
        planned.sort_by_key(|(min_order, _)| *min_order);

        Self {
            job_type: job_type.to_string(),
            categories: planned.into_iter().map(|(_, category)| category).collect(),
        }
    }

    pub fn job_type(&self) -> &str {
        &self.job_type
    }

    pub fn categories(&self) -> &[PlannedCategory] {
        &self.categories
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    pub fn question_count(&self) -> usize {
        self.categories
            .iter()
            .map(|planned| planned.question_ids.len())
            .sum()
    }

    pub fn category_at(&self, position: NavigationPosition) -> Option<&CategoryDefinition> {
        self.categories
            .get(position.category_index)
            .map(|planned| &planned.category)
    }

    pub fn question_at(&self, position: NavigationPosition) -> Option<u32> {
        self.categories
            .get(position.category_index)?
            .question_ids
            .get(position.question_index)
            .copied()
    }

    pub fn position_of(&self, question_id: u32) -> Option<NavigationPosition> {
        self.positions()
            .find(|(_, id)| *id == question_id)
            .map(|(position, _)| position)
    }

    /// Every `(position, question_id)` in display order.
    pub fn positions(&self) -> impl Iterator<Item = (NavigationPosition, u32)> + '_ {
        self.categories
            .iter()
            .enumerate()
            .flat_map(|(category_index, planned)| {
                planned
                    .question_ids
                    .iter()
                    .enumerate()
                    .map(move |(question_index, id)| {
                        (NavigationPosition::new(category_index, question_index), *id)
                    })
            })
    }

    /// Nearest valid position to the requested indices; `None` for an empty plan.
    pub fn clamp(&self, category_index: usize, question_index: usize) -> Option<NavigationPosition> {
        let last_category = self.categories.len().checked_sub(1)?;
        let category_index = category_index.min(last_category);
        let last_question = self.categories[category_index]
            .question_ids
            .len()
            .saturating_sub(1);
        Some(NavigationPosition::new(
            category_index,
            question_index.min(last_question),
        ))
    }

    pub fn next_position(&self, position: NavigationPosition) -> Option<NavigationPosition> {
        let planned = self.categories.get(position.category_index)?;
        if position.question_index + 1 < planned.question_ids.len() {
            return Some(NavigationPosition::new(
                position.category_index,
                position.question_index + 1,
            ));
        }
        let next_category = position.category_index + 1;
        if next_category < self.categories.len() {
            return Some(NavigationPosition::new(next_category, 0));
        }
        None
    }

    pub fn previous_position(&self, position: NavigationPosition) -> Option<NavigationPosition> {
        if position.question_index > 0 {
            return Some(NavigationPosition::new(
                position.category_index,
                position.question_index - 1,
            ));
        }
        let previous_category = position.category_index.checked_sub(1)?;
        let last_question = self
            .categories
            .get(previous_category)?
            .question_ids
            .len()
            .saturating_sub(1);
        Some(NavigationPosition::new(previous_category, last_question))
    }
}
