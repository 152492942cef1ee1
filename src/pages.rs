//! Page bookkeeping: page count, active page, and page-membership cascades.
//!
//! Elements on non-active pages stay in the document; they are only hidden
//! from interaction and rendering. Deleting a page removes its elements and
//! renumbers everything after it so page numbers stay dense in `1..=num_pages`.

#[cfg(test)]
#[path = "pages_test.rs"]
mod pages_test;

use crate::doc::{ElementId, PlanStore};
use crate::error::EngineError;

/// Page count and the page currently shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageState {
    num_pages: u32,
    active_page: u32,
}

impl Default for PageState {
    fn default() -> Self {
        Self { num_pages: 1, active_page: 1 }
    }
}

impl PageState {
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidPage`] if `num_pages` is zero or
    /// `active_page` is outside `1..=num_pages`.
    pub fn with_pages(num_pages: u32, active_page: u32) -> Result<Self, EngineError> {
        if num_pages == 0 {
            return Err(EngineError::InvalidPage { page: active_page, num_pages });
        }
        let state = Self { num_pages, active_page: 1 };
        state.validate(active_page)?;
        Ok(Self { num_pages, active_page })
    }

    #[must_use]
    pub fn num_pages(&self) -> u32 {
        self.num_pages
    }

    #[must_use]
    pub fn active_page(&self) -> u32 {
        self.active_page
    }

    #[must_use]
    pub fn is_valid(&self, page: u32) -> bool {
        (1..=self.num_pages).contains(&page)
    }

    /// # Errors
    ///
    /// Returns [`EngineError::InvalidPage`] when `page` is out of range.
    pub fn validate(&self, page: u32) -> Result<(), EngineError> {
        if self.is_valid(page) {
            Ok(())
        } else {
            Err(EngineError::InvalidPage { page, num_pages: self.num_pages })
        }
    }

    /// Append a page and switch to it. Only allowed from the last page.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::AddPageNotAtEnd`] when the active page is not the last one.
    pub fn add_page(&mut self) -> Result<u32, EngineError> {
        if self.active_page != self.num_pages {
            return Err(EngineError::AddPageNotAtEnd { active: self.active_page, num_pages: self.num_pages });
        }
        self.num_pages += 1;
        self.active_page = self.num_pages;
        Ok(self.active_page)
    }

    /// Switch the active page.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidPage`] when `page` is out of range.
    pub fn change_page(&mut self, page: u32) -> Result<(), EngineError> {
        self.validate(page)?;
        self.active_page = page;
        Ok(())
    }

    /// Delete `page`: remove its elements, shift later pages down by one,
    /// and clamp the active page into the new range.
    ///
    /// Returns the ids of the removed elements.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::LastPage`] when only one page exists and
    /// [`EngineError::InvalidPage`] when `page` is out of range.
    pub fn delete_page(&mut self, page: u32, store: &mut PlanStore) -> Result<Vec<ElementId>, EngineError> {
        if self.num_pages <= 1 {
            return Err(EngineError::LastPage);
        }
        self.validate(page)?;

        // Collect first, mutate after: never remove while iterating the store.
        let mut doomed = Vec::new();
        let mut shifted = Vec::new();
        for el in store.sorted() {
            if el.page == page {
                doomed.push(el.id);
            } else if el.page > page {
                shifted.push(el.id);
            }
        }
        store.remove_all(&doomed);
        for id in &shifted {
            if let Some(el) = store.get_mut(id) {
                el.set_page(el.page - 1);
            }
        }

        self.num_pages -= 1;
        self.active_page = self.active_page.clamp(1, self.num_pages);
        Ok(doomed)
    }
}

/// Move the given elements to `page`. Missing ids are skipped.
///
/// Returns the ids that were actually moved.
pub fn move_to_page(store: &mut PlanStore, ids: &[ElementId], page: u32) -> Vec<ElementId> {
    let mut moved = Vec::new();
    for id in ids {
        let Some(el) = store.get_mut(id) else {
            continue;
        };
        if el.page != page {
            el.set_page(page);
            moved.push(*id);
        }
    }
    moved
}
