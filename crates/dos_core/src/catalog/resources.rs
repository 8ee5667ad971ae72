//! Resource library: guides and templates with search, categories and
//! session favorites.

use crate::model::catalog::{Resource, ResourceKind, ResourceLink};
use std::collections::BTreeSet;

static RESOURCES: [Resource; 5] = [
    Resource {
        id: "1",
        title: "Guide complet de la création d'entreprise 2024",
        kind: ResourceKind::Guide,
        category: "Création",
        description: "Tout ce qu'il faut savoir pour créer son entreprise en France cette année.",
        link: ResourceLink::External("#"),
        tags: &["création", "guide", "débutant"],
    },
    Resource {
        id: "2",
        title: "Modèle de statuts SASU",
        kind: ResourceKind::Template,
        category: "Juridique",
        description: "Statuts types pour une SASU avec clauses recommandées.",
        link: ResourceLink::Download("#"),
        tags: &["statuts", "SASU", "juridique"],
    },
    Resource {
        id: "3",
        title: "Template Business Plan Excel",
        kind: ResourceKind::Template,
        category: "Business Plan",
        description: "Modèle complet avec prévisionnel financier sur 3 ans.",
        link: ResourceLink::Download("#"),
        tags: &["business plan", "financier", "prévisionnel"],
    },
    Resource {
        id: "4",
        title: "Fiscalité de l'entrepreneur : les bases",
        kind: ResourceKind::Article,
        category: "Fiscal",
        description: "Comprendre la TVA, l'IS et l'IR pour les entrepreneurs.",
        link: ResourceLink::External("#"),
        tags: &["fiscalité", "TVA", "impôts"],
    },
    Resource {
        id: "5",
        title: "Modèle de facture conforme",
        kind: ResourceKind::Template,
        category: "Comptabilité",
        description: "Facture aux normes avec toutes les mentions légales.",
        link: ResourceLink::Download("#"),
        tags: &["facture", "comptabilité", "template"],
    },
];

pub fn resources() -> &'static [Resource] {
    &RESOURCES
}

pub fn resource(id: &str) -> Option<&'static Resource> {
    RESOURCES.iter().find(|resource| resource.id == id)
}

fn matches_query(resource: &Resource, query: &str) -> bool {
    resource.title.to_lowercase().contains(query)
        || resource.description.to_lowercase().contains(query)
        || resource
            .tags
            .iter()
            .any(|tag| tag.to_lowercase().contains(query))
}

/// Resources whose title, description or a tag contains `query`,
/// case-insensitively, in library order. An empty query keeps everything.
pub fn filter_resources(query: &str) -> Vec<&'static Resource> {
    let query = query.to_lowercase();
    RESOURCES
        .iter()
        .filter(|resource| matches_query(resource, &query))
        .collect()
}

/// Distinct categories in first-appearance order.
pub fn categories() -> Vec<&'static str> {
    let mut seen = Vec::new();
    for resource in &RESOURCES {
        if !seen.contains(&resource.category) {
            seen.push(resource.category);
        }
    }
    seen
}

/// Search results restricted to one category tab.
pub fn filter_in_category(query: &str, category: &str) -> Vec<&'static Resource> {
    filter_resources(query)
        .into_iter()
        .filter(|resource| resource.category == category)
        .collect()
}

/// Favorite resource ids for the current session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceFavorites {
    ids: BTreeSet<&'static str>,
}

impl ResourceFavorites {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flips the favorite flag of `id`.
    ///
    /// Returns the new flag, or `None` when no resource has that id.
    pub fn toggle(&mut self, id: &str) -> Option<bool> {
        let resource = resource(id)?;
        if self.ids.remove(resource.id) {
            Some(false)
        } else {
            self.ids.insert(resource.id);
            Some(true)
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Search results restricted to favorites, in library order.
    pub fn filter(&self, query: &str) -> Vec<&'static Resource> {
        filter_resources(query)
            .into_iter()
            .filter(|resource| self.contains(resource.id))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::{categories, filter_resources, ResourceFavorites};

    #[test]
    fn query_matches_tags_case_insensitively() {
        let ids: Vec<&str> = filter_resources("tva").iter().map(|r| r.id).collect();
        assert_eq!(ids, vec!["4"]);
        assert_eq!(filter_resources("").len(), 5);
        assert!(filter_resources("introuvable").is_empty());
    }

    #[test]
    fn categories_are_distinct() {
        assert_eq!(
            categories(),
            vec!["Création", "Juridique", "Business Plan", "Fiscal", "Comptabilité"]
        );
    }

    #[test]
    fn unknown_ids_are_not_favorited() {
        let mut favorites = ResourceFavorites::new();
        assert_eq!(favorites.toggle("42"), None);
        assert!(favorites.is_empty());
    }
}
