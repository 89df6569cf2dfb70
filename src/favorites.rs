/// Session-scoped set of favorite recipe ids.
///
/// Insertion order is kept so the favorites can be listed the way the user
/// marked them. Membership changes only through [`FavoritesSet::toggle`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FavoritesSet {
    ids: Vec<String>,
}

impl FavoritesSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the id if absent, remove it if present. Returns the new membership.
    pub fn toggle(&mut self, recipe_id: &str) -> bool {
        match self.ids.iter().position(|id| id == recipe_id) {
            Some(pos) => {
                self.ids.remove(pos);
                false
            }
            None => {
                self.ids.push(recipe_id.to_string());
                true
            }
        }
    }

    pub fn is_favorite(&self, recipe_id: &str) -> bool {
        self.ids.iter().any(|id| id == recipe_id)
    }

    pub fn count(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }
}
