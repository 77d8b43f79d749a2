//! Detail screen state for a single Pokémon.

use crate::config::Locale;
use crate::fetch::Catalog;
use crate::models::Detail;
use crate::toast::{Toast, ToastKind};
use crate::utils::{
    format_name, share_text, stat_fraction, stat_label, type_color, DEFAULT_TYPE_COLOR,
};
use tracing::error;

#[derive(Debug, Clone, PartialEq)]
pub enum DetailState {
    Loading { id: u32 },
    Loaded(Box<Detail>),
    Failed { id: u32 },
}

/// One rendered stat: localized label, base value and bar fraction.
#[derive(Debug, Clone, PartialEq)]
pub struct StatRow {
    pub label: String,
    pub value: u32,
    pub fraction: f64,
}

#[derive(Debug, Clone)]
pub struct DetailView {
    state: DetailState,
    favorite: bool,
    locale: Locale,
}

impl DetailView {
    /// Enters the loading state for `id`.
    pub fn open(id: u32, locale: Locale) -> Self {
        Self {
            state: DetailState::Loading { id },
            favorite: false,
            locale,
        }
    }

    /// Detail view for a record that was fetched before the view opened.
    pub fn loaded(detail: Detail, locale: Locale) -> Self {
        Self {
            state: DetailState::Loaded(Box::new(detail)),
            favorite: false,
            locale,
        }
    }

    pub fn state(&self) -> &DetailState {
        &self.state
    }

    pub fn id(&self) -> u32 {
        match &self.state {
            DetailState::Loading { id } | DetailState::Failed { id } => *id,
            DetailState::Loaded(d) => d.id,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, DetailState::Loading { .. })
    }

    pub fn detail(&self) -> Option<&Detail> {
        match &self.state {
            DetailState::Loaded(d) => Some(d.as_ref()),
            _ => None,
        }
    }

    pub fn is_favorite(&self) -> bool {
        self.favorite
    }

    /// Stores a fetched record. Records for a different id are dropped and
    /// `false` is returned.
    pub fn apply(&mut self, detail: Detail) -> bool {
        match self.state {
            DetailState::Loading { id } if id == detail.id => {
                self.state = DetailState::Loaded(Box::new(detail));
                true
            }
            _ => false,
        }
    }

    pub fn apply_failure(&mut self) {
        if let DetailState::Loading { id } = self.state {
            self.state = DetailState::Failed { id };
        }
    }

    /// Color of the first type, or the default color when nothing is loaded.
    pub fn primary_type_color(&self) -> &'static str {
        self.detail()
            .and_then(|d| d.types.first())
            .map(|t| type_color(&t.kind.name))
            .unwrap_or(DEFAULT_TYPE_COLOR)
    }

    pub fn total_stats(&self) -> u32 {
        self.detail()
            .map(|d| d.stats.iter().map(|s| s.base_stat).sum())
            .unwrap_or(0)
    }

    pub fn image_url(&self) -> &str {
        self.detail().and_then(|d| d.artwork()).unwrap_or("")
    }

    pub fn stat_rows(&self) -> Vec<StatRow> {
        self.detail()
            .map(|d| {
                d.stats
                    .iter()
                    .map(|s| StatRow {
                        label: stat_label(&s.stat.name, self.locale),
                        value: s.base_stat,
                        fraction: stat_fraction(s.base_stat),
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    fn display_name(&self) -> String {
        format_name(self.detail().map(|d| d.name.as_str()).unwrap_or(""))
    }

    /// Flips the local favorite flag. Nothing is persisted.
    pub fn toggle_favorite(&mut self) -> Toast {
        self.favorite = !self.favorite;
        let name = self.display_name();
        let (kind, action) = match (self.favorite, self.locale) {
            (true, Locale::En) => (ToastKind::Success, "added to favorites"),
            (false, Locale::En) => (ToastKind::Muted, "removed from favorites"),
            (true, Locale::Es) => (ToastKind::Success, "agregado a favoritos"),
            (false, Locale::Es) => (ToastKind::Muted, "removido de favoritos"),
        };
        Toast::new(kind, format!("{} {}", name, action))
    }

    /// Composes the share text. There is no share target in a terminal, so
    /// the text is only reported back to the user.
    pub fn share(&self) -> Option<Toast> {
        let d = self.detail()?;
        Some(Toast::new(ToastKind::Info, share_text(&d.name, d.id, self.locale)))
    }

    /// Fetches the record for the current id and applies the outcome.
    pub async fn load<C: Catalog>(&mut self, catalog: &C) {
        let id = self.id();
        match catalog.fetch_by_id(id).await {
            Ok(detail) => {
                self.apply(detail);
            }
            Err(e) => {
                error!(id, error = %e, "error loading pokémon details");
                self.apply_failure();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NamedResource, Stat, TypeSlot};
    use pretty_assertions::assert_eq;

    fn bulbasaur() -> Detail {
        Detail {
            id: 1,
            name: "bulbasaur".into(),
            height: 7,
            weight: 69,
            types: vec![
                TypeSlot {
                    slot: 1,
                    kind: NamedResource {
                        name: "grass".into(),
                        url: String::new(),
                    },
                },
                TypeSlot {
                    slot: 2,
                    kind: NamedResource {
                        name: "poison".into(),
                        url: String::new(),
                    },
                },
            ],
            stats: [("hp", 45), ("attack", 49), ("special-attack", 300)]
                .iter()
                .map(|(n, v)| Stat {
                    base_stat: *v,
                    effort: 0,
                    stat: NamedResource {
                        name: n.to_string(),
                        url: String::new(),
                    },
                })
                .collect(),
            ..Detail::default()
        }
    }

    #[test]
    fn starts_loading_with_defaults() {
        let view = DetailView::open(1, Locale::En);
        assert!(view.is_loading());
        assert_eq!(view.primary_type_color(), DEFAULT_TYPE_COLOR);
        assert_eq!(view.total_stats(), 0);
        assert_eq!(view.image_url(), "");
        assert!(view.share().is_none());
    }

    #[test]
    fn applies_matching_record() {
        let mut view = DetailView::open(1, Locale::En);
        assert!(view.apply(bulbasaur()));
        assert_eq!(view.primary_type_color(), "#78C850");
        assert_eq!(view.total_stats(), 45 + 49 + 300);
    }

    #[test]
    fn drops_record_for_other_id() {
        let mut view = DetailView::open(4, Locale::En);
        assert!(!view.apply(bulbasaur()));
        assert!(view.is_loading());
    }

    #[test]
    fn failure_leaves_loading() {
        let mut view = DetailView::open(1, Locale::En);
        view.apply_failure();
        assert_eq!(view.state(), &DetailState::Failed { id: 1 });
        assert_eq!(view.id(), 1);
    }

    #[test]
    fn stat_rows_are_localized_and_clamped() {
        let mut view = DetailView::open(1, Locale::Es);
        view.apply(bulbasaur());
        let rows = view.stat_rows();
        assert_eq!(rows[0].label, "PS");
        assert_eq!(rows[2].label, "At. Esp.");
        assert_eq!(rows[2].fraction, 1.0);
    }

    #[test]
    fn favorite_toggles_back_and_forth() {
        let mut view = DetailView::open(1, Locale::En);
        view.apply(bulbasaur());
        let on = view.toggle_favorite();
        assert!(view.is_favorite());
        assert_eq!(on.message, "Bulbasaur added to favorites");
        assert_eq!(on.kind, ToastKind::Success);
        let off = view.toggle_favorite();
        assert!(!view.is_favorite());
        assert_eq!(off.message, "Bulbasaur removed from favorites");
    }

    #[test]
    fn share_reports_padded_id() {
        let mut view = DetailView::open(1, Locale::En);
        view.apply(bulbasaur());
        assert_eq!(
            view.share().map(|t| t.message),
            Some("Check out this Pokémon! Bulbasaur #001".to_string())
        );
    }
}
