//! Interactive shell - the event loop between a terminal and a session.
//!
//! Search and grid changes apply immediately. Store calls (reload, add,
//! delete, row actions) run as their own tasks so the prompt never waits on
//! the network; the grid is re-rendered whenever the catalog recomputes.

use std::io::{self, Write};
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::task::JoinHandle;

use crate::command::{parse_line, ShellCommand, HELP};
use crate::grid::Grid;
use crate::session::{CatalogSession, Command};
use crate::store::BookStore;

pub struct Shell<S, W> {
    session: CatalogSession<S>,
    grid: Arc<Mutex<Grid>>,
    out: Arc<Mutex<W>>,
    pending: Vec<JoinHandle<bool>>,
}

impl<S, W> Shell<S, W>
where
    S: BookStore + 'static,
    W: Write + Send + 'static,
{
    pub fn new(session: CatalogSession<S>, grid: Grid, out: W) -> Self {
        Self {
            session,
            grid: Arc::new(Mutex::new(grid)),
            out: Arc::new(Mutex::new(out)),
            pending: Vec::new(),
        }
    }

    /// Read commands until `quit` or end of input, then wait for every store
    /// call still in flight. Returns the writer.
    pub async fn run<R>(mut self, input: R) -> io::Result<W>
    where
        R: AsyncBufRead + Unpin,
    {
        let grid = Arc::clone(&self.grid);
        let out = Arc::clone(&self.out);
        let subscription = self.session.subscribe(move |view| {
            let table = grid.lock().render(view);
            let _ = write!(out.lock(), "{}", table);
        });

        self.dispatch(Command::Reload);

        let mut lines = input.lines();
        while let Some(line) = lines.next_line().await? {
            match parse_line(&line) {
                Ok(None) => {}
                Ok(Some(ShellCommand::Quit)) => break,
                Ok(Some(command)) => self.apply(command)?,
                Err(e) => writeln!(self.out.lock(), "error: {}", e)?,
            }
            self.pending.retain(|handle| !handle.is_finished());
        }

        for handle in self.pending.drain(..) {
            if let Err(e) = handle.await {
                tracing::error!(error = %e, "store task panicked");
            }
        }
        self.session.unsubscribe(subscription);

        drop(self.grid);
        match Arc::try_unwrap(self.out) {
            Ok(out) => Ok(out.into_inner()),
            Err(_) => Err(io::Error::other("shell output still shared")),
        }
    }

    fn dispatch(&mut self, command: Command) {
        match command {
            Command::Search(term) => self.session.set_search_term(term),
            command => self.pending.push(self.session.spawn(command)),
        }
    }

    fn apply(&mut self, command: ShellCommand) -> io::Result<()> {
        match command {
            ShellCommand::Catalog(command) => self.dispatch(command),
            ShellCommand::Press { row, column } => {
                let view = self.session.view();
                let resolved = self.grid.lock().press(&view, row, &column);
                match resolved {
                    Ok(command) => self.dispatch(command),
                    Err(e) => writeln!(self.out.lock(), "error: {}", e)?,
                }
            }
            ShellCommand::Sort(spec) => {
                let result = self.grid.lock().set_sort(spec);
                self.show_or_report(result)?;
            }
            ShellCommand::Where(filter) => {
                let result = {
                    let mut grid = self.grid.lock();
                    match filter {
                        Some(filter) => grid.add_filter(filter),
                        None => {
                            grid.clear_filters();
                            Ok(())
                        }
                    }
                };
                self.show_or_report(result)?;
            }
            ShellCommand::Show => self.show()?,
            ShellCommand::Help => writeln!(self.out.lock(), "{}", HELP)?,
            ShellCommand::Quit => {}
        }
        Ok(())
    }

    fn show_or_report(&self, result: Result<(), crate::grid::GridError>) -> io::Result<()> {
        match result {
            Ok(()) => self.show(),
            Err(e) => writeln!(self.out.lock(), "error: {}", e),
        }
    }

    fn show(&self) -> io::Result<()> {
        let view = self.session.view();
        let table = self.grid.lock().render(&view);
        write!(self.out.lock(), "{}", table)
    }
}
