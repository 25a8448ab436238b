use compress_core::AppViewModel;

const BAR_WIDTH: usize = 30;

pub(crate) fn render_line(view: &AppViewModel) -> String {
    let filled = usize::from(view.progress.min(100)) * BAR_WIDTH / 100;
    format!(
        "[{}{}] {:>3}% {}",
        "#".repeat(filled),
        "-".repeat(BAR_WIDTH - filled),
        view.progress,
        view.status
    )
}

/// Prints a progress line whenever the rendered text changes.
#[derive(Debug, Default)]
pub(crate) struct Renderer {
    last: Option<String>,
}

impl Renderer {
    pub(crate) fn render(&mut self, view: &AppViewModel) {
        let line = render_line(view);
        if self.last.as_deref() == Some(line.as_str()) {
            return;
        }
        println!("{line}");
        self.last = Some(line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use compress_core::{update, AppState, Msg};

    #[test]
    fn bar_tracks_progress() {
        let view = AppState::new().view();
        assert_eq!(
            render_line(&view),
            format!("[{}]   0% Waiting for server…", "-".repeat(BAR_WIDTH))
        );

        let (state, _) = update(AppState::new(), Msg::ServerReady);
        let mut view = state.view();
        view.progress = 50;
        let line = render_line(&view);
        assert!(line.starts_with(&format!("[{}{}]", "#".repeat(15), "-".repeat(15))));
        assert!(line.ends_with(" 50% Ready"));
    }
}
