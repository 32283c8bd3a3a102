//! Org-chart view state: expand/collapse, search mode and pagination.
//!
//! The view owns its expanded-id set and rebuilds the forest from scratch on
//! every applied fetch. Fetches are tagged with a generation so that a slow
//! response for an older request can never overwrite a newer one.

use std::collections::HashSet;

use hierarchy::{build_forest, filter_by_query, flatten, EmployeeNode, EmployeeRecord, Forest};

use crate::config::ViewPreferences;
use crate::employee::EmployeeListing;
use crate::error::DirectoryResult;
use crate::pagination::{Page, PageRequest};
use crate::service::Directory;

/// Handle for one in-flight fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    generation: u64,
}

impl FetchTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// One visible line of the org chart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewRow {
    pub id: String,
    pub name: String,
    pub designation: String,
    pub department: Option<String>,
    pub status: &'static str,
    pub depth: usize,
    pub has_children: bool,
    pub expanded: bool,
}

#[derive(Debug, Clone)]
pub struct DirectoryView {
    forest: Forest,
    expanded: HashSet<String>,
    search: String,
    page: usize,
    page_size: usize,
    total: usize,
    total_pages: usize,
    generation: u64,
    applied_generation: u64,
    expand_roots: bool,
}

impl DirectoryView {
    pub fn new(preferences: &ViewPreferences) -> Self {
        Self {
            forest: Forest::default(),
            expanded: HashSet::new(),
            search: String::new(),
            page: 1,
            page_size: preferences.page_size.max(1),
            total: 0,
            total_pages: 1,
            generation: 0,
            applied_generation: 0,
            expand_roots: preferences.expand_roots,
        }
    }

    pub fn forest(&self) -> &Forest {
        &self.forest
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn total_pages(&self) -> usize {
        self.total_pages
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn is_searching(&self) -> bool {
        !self.search.is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.forest.is_empty()
    }

    /// Listing request for the current page and search term.
    pub fn request(&self) -> PageRequest {
        let request = PageRequest::new(self.page, self.page_size);
        if self.is_searching() {
            request.with_search(self.search.clone())
        } else {
            request
        }
    }

    /// Starts a fetch; every earlier ticket becomes stale.
    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.generation += 1;
        FetchTicket {
            generation: self.generation,
        }
    }

    pub fn is_current(&self, ticket: FetchTicket) -> bool {
        ticket.generation == self.generation
    }

    /// Applies a fetched page. Returns `false` and changes nothing when the
    /// ticket is stale or was already applied.
    pub fn apply(&mut self, ticket: FetchTicket, page: Page<EmployeeListing>) -> bool {
        if !self.is_current(ticket) || ticket.generation <= self.applied_generation {
            tracing::debug!(
                ticket = ticket.generation,
                current = self.generation,
                "discarding stale directory response"
            );
            return false;
        }
        self.applied_generation = ticket.generation;

        let records: Vec<EmployeeRecord> = page
            .data
            .iter()
            .map(|listing| EmployeeRecord::from(&listing.employee))
            .collect();
        self.forest = build_forest(&records);
        self.total = page.total;
        self.total_pages = page.total_pages.max(1);
        self.page = page.page.max(1);

        let forest = &self.forest;
        self.expanded.retain(|id| forest.find(id).is_some());
        if self.expand_roots {
            self.expanded
                .extend(forest.roots().iter().map(|root| root.id().to_string()));
        }
        true
    }

    /// Fetches the current request from `directory` and applies it.
    pub async fn refresh(&mut self, directory: &Directory) -> DirectoryResult<bool> {
        let ticket = self.begin_fetch();
        let page = directory.list_employees(&self.request()).await?;
        Ok(self.apply(ticket, page))
    }

    /// Changes the search term. A non-empty term restarts at page 1.
    pub fn set_search(&mut self, term: impl Into<String>) {
        self.search = term.into();
        if self.is_searching() {
            self.page = 1;
        }
    }

    pub fn set_page(&mut self, page: usize) {
        self.page = page.clamp(1, self.total_pages.max(1));
    }

    pub fn next_page(&mut self) {
        self.set_page(self.page + 1);
    }

    pub fn previous_page(&mut self) {
        self.set_page(self.page.saturating_sub(1));
    }

    pub fn is_expanded(&self, id: &str) -> bool {
        self.expanded.contains(id)
    }

    pub fn toggle(&mut self, id: &str) {
        if !self.expanded.remove(id) {
            self.expanded.insert(id.to_string());
        }
    }

    pub fn expand(&mut self, id: &str) {
        self.expanded.insert(id.to_string());
    }

    pub fn collapse(&mut self, id: &str) {
        self.expanded.remove(id);
    }

    /// Expands every node that has reports.
    pub fn expand_all(&mut self) {
        let ids: Vec<String> = self
            .forest
            .walk()
            .filter(|(_, node)| node.has_subordinates())
            .map(|(_, node)| node.id().to_string())
            .collect();
        self.expanded.extend(ids);
    }

    pub fn collapse_all(&mut self) {
        self.expanded.clear();
    }

    /// Visible rows: the expanded tree by default, or a flat filtered list
    /// while a search term is set.
    pub fn rows(&self) -> Vec<ViewRow> {
        if self.is_searching() {
            let flat = flatten(&self.forest);
            return filter_by_query(&flat, &self.search)
                .into_iter()
                .map(|node| self.row(node, 0))
                .collect();
        }

        let mut rows = Vec::new();
        let mut stack: Vec<(usize, &EmployeeNode)> = self
            .forest
            .roots()
            .iter()
            .rev()
            .map(|node| (0, node))
            .collect();
        while let Some((depth, node)) = stack.pop() {
            rows.push(self.row(node, depth));
            if self.is_expanded(node.id()) {
                stack.extend(
                    node.subordinates
                        .iter()
                        .rev()
                        .map(|child| (depth + 1, child)),
                );
            }
        }
        rows
    }

    fn row(&self, node: &EmployeeNode, depth: usize) -> ViewRow {
        let record = &node.record;
        ViewRow {
            id: record.id.clone(),
            name: record.display_name(),
            designation: record.designation.clone(),
            department: record.department.clone(),
            status: record.status(),
            depth,
            has_children: node.has_subordinates(),
            expanded: self.is_expanded(node.id()),
        }
    }
}
