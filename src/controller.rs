use std::fmt;

use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

use crate::display::{convert_tree, ChartOptions, ChartWidget};
use crate::error::ViewerError;
use crate::model::FileDescriptor;
use crate::page::{Control, Page};
use crate::source::TreeSource;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShowOutcome {
    Rendered,
    /// A later display was requested before this response arrived; it was dropped.
    Superseded,
}

/// What is on screen after a successful render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeSummary {
    pub filename: String,
    pub nodes: usize,
    pub depth: usize,
}

impl fmt::Display for TreeSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} nodes, depth {}",
            self.filename, self.nodes, self.depth
        )
    }
}

#[derive(Debug, Default)]
struct ViewState {
    files: Vec<FileDescriptor>,
    current: Option<TreeSummary>,
    issued: u64,
}

/// Drives the file list, the controls on the page and the chart.
///
/// Every display request takes a ticket when it is issued. A response is only
/// drawn if its ticket is still the newest one issued, so the most recently
/// requested file always ends up on screen whatever order responses arrive in.
pub struct FileListController<S, W, P> {
    source: S,
    widget: Mutex<W>,
    page: Mutex<P>,
    options: ChartOptions,
    state: Mutex<ViewState>,
}

impl<S, W, P> FileListController<S, W, P>
where
    S: TreeSource,
    W: ChartWidget,
    P: Page,
{
    pub fn new(source: S, widget: W, page: P, options: ChartOptions) -> Self {
        Self {
            source,
            widget: Mutex::new(widget),
            page: Mutex::new(page),
            options,
            state: Mutex::new(ViewState::default()),
        }
    }

    /// Loads the file list, adds one control per file and shows the first
    /// file. Returns how many controls were added.
    pub async fn start(&self) -> Result<usize, ViewerError> {
        let files = match self.source.list_files().await {
            Ok(files) => files,
            Err(err) => {
                error!(error = %err, "failed to load file list");
                return Err(err);
            }
        };

        let Some(first) = files.first().map(|f| f.filename.clone()) else {
            info!("file list is empty");
            return Ok(0);
        };

        {
            let mut page = self.page.lock().await;
            for (index, file) in files.iter().enumerate() {
                let control = Control {
                    index,
                    label: file.filename.clone(),
                };
                if let Err(err) = page.append_control(&control) {
                    warn!(label = %control.label, error = %err, "failed to add control");
                }
            }
        }
        let count = files.len();
        self.state.lock().await.files = files;
        info!(count, "added file controls");

        // Failures are logged by show_file; the controls stay usable.
        let _ = self.show_file(&first).await;
        Ok(count)
    }

    /// Activation handler for the control at `index`.
    pub async fn activate(&self, index: usize) -> Result<ShowOutcome, ViewerError> {
        let filename = {
            let state = self.state.lock().await;
            state
                .files
                .get(index)
                .map(|f| f.filename.clone())
                .ok_or(ViewerError::UnknownControl(index))?
        };
        self.show_file(&filename).await
    }

    pub async fn show_file(&self, filename: &str) -> Result<ShowOutcome, ViewerError> {
        let ticket = {
            let mut state = self.state.lock().await;
            state.issued += 1;
            state.issued
        };
        debug!(filename, ticket, "loading tree");

        let tree = match self.source.load_tree(filename).await {
            Ok(tree) => tree,
            Err(err) => {
                error!(filename, error = %err, "failed to load tree");
                return Err(err);
            }
        };

        let mut state = self.state.lock().await;
        if ticket != state.issued {
            debug!(filename, ticket, issued = state.issued, "dropping stale tree");
            return Ok(ShowOutcome::Superseded);
        }

        let mut widget = self.widget.lock().await;
        if let Err(err) = convert_tree(&tree, &self.options, &mut *widget) {
            error!(filename, error = %err, "failed to render tree");
            return Err(err);
        }
        let summary = TreeSummary {
            filename: filename.to_string(),
            nodes: tree.count_nodes(),
            depth: tree.depth(),
        };
        info!(
            filename,
            nodes = summary.nodes,
            depth = summary.depth,
            "rendered tree"
        );
        state.current = Some(summary);
        Ok(ShowOutcome::Rendered)
    }

    /// The file whose tree is on screen, if any.
    pub async fn current_file(&self) -> Option<String> {
        self.current_summary().await.map(|s| s.filename)
    }

    pub async fn current_summary(&self) -> Option<TreeSummary> {
        self.state.lock().await.current.clone()
    }

    pub async fn files(&self) -> Vec<FileDescriptor> {
        self.state.lock().await.files.clone()
    }

    pub fn into_parts(self) -> (S, W, P) {
        (self.source, self.widget.into_inner(), self.page.into_inner())
    }
}
