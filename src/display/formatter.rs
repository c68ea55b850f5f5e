use crate::display::{SearchResult, SettingsProvider};
use crate::retrieval::{Hit, ItemRecord, ItemRepository};

/// Resolves title, icon and URL for merged hits
pub struct DisplayFormatter<'a, R: ?Sized, S: ?Sized> {
    repository: &'a R,
    settings: &'a S,
}

impl<'a, R, S> DisplayFormatter<'a, R, S>
where
    R: ItemRepository + ?Sized,
    S: SettingsProvider + ?Sized,
{
    pub fn new(repository: &'a R, settings: &'a S) -> Self {
        Self {
            repository,
            settings,
        }
    }

    /// Format every hit that resolves fully, preserving order
    pub fn format_all<'h, I>(&self, hits: I) -> Vec<SearchResult>
    where
        I: IntoIterator<Item = &'h Hit>,
    {
        hits.into_iter().filter_map(|hit| self.format(hit)).collect()
    }

    /// `None` when the hit has no readable item, no title or no icon
    pub fn format(&self, hit: &Hit) -> Option<SearchResult> {
        let Some(item) = self.resolve_item(hit) else {
            tracing::debug!("Dropping {}: backing item unavailable", hit.item_id);
            return None;
        };

        let Some(title) = hit.title() else {
            tracing::debug!("Dropping {}: no display name or name", hit.item_id);
            return None;
        };

        let Some(icon) = self.resolve_icon(hit, &item) else {
            tracing::debug!("Dropping {}: no icon resolvable", hit.item_id);
            return None;
        };

        let url = hit.uri.clone().unwrap_or_default();

        Some(SearchResult::new(title, icon, url))
    }

    fn resolve_item(&self, hit: &Hit) -> Option<ItemRecord> {
        match self.repository.get_item(&hit.item_id) {
            Ok(item) => item,
            Err(e) => {
                tracing::warn!("Item lookup failed for {}: {}", hit.item_id, e);
                None
            }
        }
    }

    fn resolve_icon(&self, hit: &Hit, item: &ItemRecord) -> Option<String> {
        hit.icon
            .clone()
            .or_else(|| item.icon.clone())
            .or_else(|| self.settings.default_icon())
    }
}
