#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use gridharvest::driver::{Driver, Target};
use gridharvest::process::HarvestOptions;
use gridharvest::settle::SettleOptions;
use gridharvest::Result;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Goto(String),
    Fill(Target, String),
    Click(Target, u32),
    Close,
}

#[derive(Debug, Default)]
struct State {
    current: usize,
    ignored_next_clicks: u32,
    calls: Vec<Call>,
}

/// In-memory page sequence standing in for a browser. Navigation moves between the
/// canned snapshots; pages listed in `refuse` report failure, pages in `stuck` report
/// success but keep showing the previous page.
pub struct FakeDriver {
    pages: Vec<String>,
    refuse: HashSet<u32>,
    stuck: HashSet<u32>,
    state: Mutex<State>,
}

impl FakeDriver {
    pub fn new(pages: Vec<String>) -> Self {
        Self {
            pages,
            refuse: HashSet::new(),
            stuck: HashSet::new(),
            state: Mutex::new(State::default()),
        }
    }

    pub fn refusing(mut self, page: u32) -> Self {
        self.refuse.insert(page);
        self
    }

    pub fn stuck_on(mut self, page: u32) -> Self {
        self.stuck.insert(page);
        self
    }

    /// The first `n` "next" clicks report success without moving the grid.
    pub fn ignoring_next_clicks(self, n: u32) -> Self {
        self.state.lock().unwrap().ignored_next_clicks = n;
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn navigation_calls(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|c| matches!(c, Call::Fill(..)) || matches!(c, Call::Click(t, _) if t.selector.contains("next_")))
            .collect()
    }

    fn show(&self, page: u32) -> bool {
        if self.refuse.contains(&page) || page == 0 || page as usize > self.pages.len() {
            return false;
        }
        if !self.stuck.contains(&page) {
            self.state.lock().unwrap().current = page as usize - 1;
        }
        true
    }
}

#[async_trait]
impl Driver for FakeDriver {
    async fn goto(&self, url: &str) -> Result<()> {
        self.state.lock().unwrap().calls.push(Call::Goto(url.into()));
        Ok(())
    }

    async fn snapshot(&self) -> Result<String> {
        let current = self.state.lock().unwrap().current;
        Ok(self.pages[current].clone())
    }

    async fn fill_and_submit(&self, target: &Target, value: &str) -> Result<bool> {
        self.state
            .lock()
            .unwrap()
            .calls
            .push(Call::Fill(target.clone(), value.into()));
        Ok(value.parse().map(|page| self.show(page)).unwrap_or(false))
    }

    async fn click(&self, target: &Target, times: u32) -> Result<bool> {
        let is_next = target.selector.contains("next_");
        let current = {
            let mut state = self.state.lock().unwrap();
            state.calls.push(Call::Click(target.clone(), times));
            if is_next && state.ignored_next_clicks > 0 {
                state.ignored_next_clicks -= 1;
                return Ok(true);
            }
            state.current as u32 + 1
        };
        if is_next {
            return Ok(self.show(current + times));
        }
        Ok(true)
    }

    async fn close(&self) -> Result<()> {
        self.state.lock().unwrap().calls.push(Call::Close);
        Ok(())
    }
}

pub fn fast_options() -> HarvestOptions {
    HarvestOptions {
        settle: SettleOptions {
            timeout: Duration::from_millis(50),
            poll: Duration::from_millis(1),
        },
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pager {
    None,
    Input,
    NextOnly,
}

/// A jqGrid page with a checkbox column, two data columns and the given pager.
pub fn grid_page(rows: &[[&str; 2]], total_records: usize, per_page: usize, pager: Pager) -> String {
    let body: String = rows
        .iter()
        .enumerate()
        .map(|(i, [name, room])| {
            format!(
                r#"<tr class="jqgrow" id="{i}"><td><input type="checkbox"></td><td title="{name}">{name}</td><td>{room}</td></tr>"#
            )
        })
        .collect();

    let controls = match pager {
        Pager::None => String::new(),
        Pager::Input => format!(
            r#"<div id="pager_tabGrid">
                 <input class="ui-pg-input" value="1">
                 <a role="button" id="next_pager_tabGrid">next</a>
                 <select class="ui-pg-selbox"><option value="{per_page}" selected>{per_page}</option></select>
                 <div id="pager_tabGrid_right"><div class="ui-paging-info">共 {total_records} 条</div></div>
               </div>"#
        ),
        Pager::NextOnly => format!(
            r#"<div id="pager_tabGrid">
                 <a role="button" id="next_pager_tabGrid">next</a>
                 <select class="ui-pg-selbox"><option value="{per_page}" selected>{per_page}</option></select>
                 <div id="pager_tabGrid_right"><div class="ui-paging-info">共 {total_records} 条</div></div>
               </div>"#
        ),
    };

    format!(
        r#"<html><body>
        <a id="tysfyzdl">统一身份认证登录</a>
        <div class="ui-jqgrid" id="gbox_tabGrid">
          <div id="gview_tabGrid">
            <table class="ui-jqgrid-htable"><thead><tr>
              <th><div class="ui-jqgrid-sortable">选择</div></th>
              <th><div class="ui-jqgrid-sortable">Name</div></th>
              <th><div class="ui-jqgrid-sortable">Room</div></th>
            </tr></thead></table>
            <table class="ui-jqgrid-btable" id="tabGrid"><tbody>{body}</tbody></table>
          </div>
          {controls}
        </div>
        </body></html>"#
    )
}
