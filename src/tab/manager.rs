//! The ordered tab collection.

use std::error::Error;

use log::debug;

use crate::pane::Pane;
use crate::pty::PtyConfig;

use super::Tab;

/// Open tabs, past which `new_tab` is silently ignored.
pub const MAX_TABS: usize = 10;

/// Tab identifier; renumbered 1..N whenever a tab is removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TabId(pub usize);

#[derive(Debug)]
pub struct TabManager {
    tabs: Vec<Tab>,
    active: usize,
    cols: usize,
    rows: usize,
    config: PtyConfig,
}

impl TabManager {
    /// Start with one tab; its spawn failure is the only way construction
    /// fails.
    pub fn new(cols: usize, rows: usize, config: PtyConfig) -> Result<Self, Box<dyn Error>> {
        let tab = Tab::new(TabId(1), cols, rows, None, config.clone())?;
        Ok(Self {
            tabs: vec![tab],
            active: 0,
            cols,
            rows,
            config,
        })
    }

    pub fn tabs(&self) -> &[Tab] {
        &self.tabs
    }

    pub fn active_index(&self) -> usize {
        self.active
    }

    pub fn active_tab(&self) -> Option<&Tab> {
        self.tabs.get(self.active)
    }

    pub fn active_tab_mut(&mut self) -> Option<&mut Tab> {
        self.tabs.get_mut(self.active)
    }

    /// Open a tab after the current ones, inheriting the active pane's
    /// working directory, and focus it. A failed shell spawn is returned
    /// and nothing is appended.
    pub fn new_tab(&mut self) -> Result<(), Box<dyn Error>> {
        if self.tabs.len() >= MAX_TABS {
            return Ok(());
        }
        let cwd = self
            .active_tab()
            .and_then(Tab::active_pane)
            .and_then(Pane::current_dir);
        let tab = Tab::new(
            TabId(self.tabs.len() + 1),
            self.cols,
            self.rows,
            cwd.as_deref(),
            self.config.clone(),
        )?;
        self.tabs.push(tab);
        self.active = self.tabs.len() - 1;
        Ok(())
    }

    /// Close the focused tab, killing its panes. The last tab stays.
    pub fn close_current_tab(&mut self) {
        if self.tabs.len() <= 1 {
            return;
        }
        let mut tab = self.tabs.remove(self.active);
        tab.close_all();
        self.renumber();
        if self.active >= self.tabs.len() {
            self.active = self.tabs.len() - 1;
        }
    }

    pub fn next_tab(&mut self) {
        if !self.tabs.is_empty() {
            self.active = (self.active + 1) % self.tabs.len();
        }
    }

    pub fn prev_tab(&mut self) {
        if !self.tabs.is_empty() {
            self.active = (self.active + self.tabs.len() - 1) % self.tabs.len();
        }
    }

    /// Propagate a window resize to every tab tree.
    pub fn resize_all(&mut self, cols: usize, rows: usize) {
        self.cols = cols;
        self.rows = rows;
        for tab in &mut self.tabs {
            tab.resize(cols, rows);
        }
    }

    /// Drop tabs whose every pane has exited, renumbering the survivors.
    /// Polled from the UI loop.
    pub fn cleanup_exited(&mut self) {
        let mut index = 0;
        while index < self.tabs.len() {
            if self.tabs[index].all_exited() {
                debug!("dropping exited tab {}", self.tabs[index].id.0);
                self.tabs.remove(index);
                if self.active > index {
                    self.active -= 1;
                }
            } else {
                index += 1;
            }
        }
        self.renumber();
        if !self.tabs.is_empty() {
            self.active = self.active.min(self.tabs.len() - 1);
        } else {
            self.active = 0;
        }
    }

    /// True when nothing is left running; the application exits on this.
    pub fn all_exited(&self) -> bool {
        self.tabs.iter().all(Tab::all_exited)
    }

    fn renumber(&mut self) {
        for (index, tab) in self.tabs.iter_mut().enumerate() {
            tab.id = TabId(index + 1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn test_config() -> PtyConfig {
        PtyConfig {
            shell: Some("/bin/sh".to_owned()),
            source_rc: false,
            ..PtyConfig::default()
        }
    }

    fn manager() -> TabManager {
        TabManager::new(80, 24, test_config()).expect("spawn manager")
    }

    #[test]
    fn starts_with_one_tab_focused() {
        let mgr = manager();
        assert_eq!(mgr.tabs().len(), 1);
        assert_eq!(mgr.active_index(), 0);
        assert_eq!(mgr.tabs()[0].id, TabId(1));
        assert!(!mgr.all_exited());
    }

    #[test]
    fn new_tab_appends_and_focuses() {
        let mut mgr = manager();
        mgr.new_tab().expect("new tab");
        assert_eq!(mgr.tabs().len(), 2);
        assert_eq!(mgr.active_index(), 1);
        assert_eq!(mgr.tabs()[1].id, TabId(2));
    }

    #[test]
    fn next_and_prev_wrap_around() {
        let mut mgr = manager();
        mgr.new_tab().expect("new tab");
        mgr.new_tab().expect("new tab");
        assert_eq!(mgr.active_index(), 2);
        mgr.next_tab();
        assert_eq!(mgr.active_index(), 0);
        mgr.prev_tab();
        assert_eq!(mgr.active_index(), 2);
        mgr.prev_tab();
        assert_eq!(mgr.active_index(), 1);
    }

    #[test]
    fn close_current_renumbers_and_keeps_last() {
        let mut mgr = manager();
        mgr.new_tab().expect("new tab");
        mgr.new_tab().expect("new tab");
        mgr.prev_tab();
        mgr.prev_tab();
        assert_eq!(mgr.active_index(), 0);
        mgr.close_current_tab();
        assert_eq!(mgr.tabs().len(), 2);
        assert_eq!(mgr.tabs()[0].id, TabId(1));
        assert_eq!(mgr.tabs()[1].id, TabId(2));

        mgr.close_current_tab();
        assert_eq!(mgr.tabs().len(), 1);
        // The last tab is kept no matter what.
        mgr.close_current_tab();
        assert_eq!(mgr.tabs().len(), 1);
    }

    #[test]
    fn tab_cap_is_silent() {
        let mut mgr = manager();
        for _ in 0..MAX_TABS + 2 {
            mgr.new_tab().expect("new tab");
        }
        assert_eq!(mgr.tabs().len(), MAX_TABS);
    }

    #[test]
    fn resize_all_reaches_every_pane() {
        let mut mgr = manager();
        mgr.new_tab().expect("new tab");
        mgr.resize_all(100, 40);
        for tab in mgr.tabs() {
            for layout in tab.get_pane_layouts() {
                let pane = tab.pane(layout.node).expect("leaf");
                assert_eq!(pane.term().lock().grid().cols, 100);
            }
        }
    }

    #[test]
    fn cleanup_drops_exited_tabs() {
        let mut mgr = manager();
        mgr.new_tab().expect("new tab");
        if let Some(tab) = mgr.active_tab_mut() {
            tab.close_all();
        }
        // Wait for the waiter threads to reap the children.
        for _ in 0..400 {
            mgr.cleanup_exited();
            if mgr.tabs().len() == 1 {
                break;
            }
            std::thread::sleep(Duration::from_millis(25));
        }
        assert_eq!(mgr.tabs().len(), 1);
        assert_eq!(mgr.tabs()[0].id, TabId(1));
        assert!(!mgr.all_exited());
    }
}
