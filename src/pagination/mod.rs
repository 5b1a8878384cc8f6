#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum PageAction {
    First,
    Prev,
    Next,
    Last,
}

/// Button state for the first/prev/next/last control.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct PageControls {
    pub current: usize,
    pub total_pages: usize,
    pub total_records: usize,
}

impl PageControls {
    pub fn new(current: usize, total_pages: usize, total_records: usize) -> Self {
        Self {
            current,
            total_pages,
            total_records,
        }
    }

    fn single_page(&self) -> bool {
        self.total_pages <= 1
    }

    pub fn can_go_back(&self) -> bool {
        !self.single_page() && self.current > 1
    }

    pub fn can_go_forward(&self) -> bool {
        !self.single_page() && self.current < self.total_pages
    }

    pub fn enabled(&self, action: PageAction) -> bool {
        match action {
            PageAction::First | PageAction::Prev => self.can_go_back(),
            PageAction::Next | PageAction::Last => self.can_go_forward(),
        }
    }

    /// Page to request for `action`, or `None` while the button is disabled.
    pub fn target(&self, action: PageAction) -> Option<usize> {
        if !self.enabled(action) {
            return None;
        }
        let page = match action {
            PageAction::First => 1,
            PageAction::Prev => self.current - 1,
            PageAction::Next => self.current + 1,
            PageAction::Last => self.total_pages,
        };
        Some(page.clamp(1, self.total_pages))
    }

    pub fn summary(&self) -> String {
        let noun = if self.total_records == 1 { "record" } else { "records" };
        format!(
            "Page {} of {} · {} {}",
            self.current.min(self.total_pages.max(1)),
            self.total_pages.max(1),
            self.total_records,
            noun
        )
    }
}
