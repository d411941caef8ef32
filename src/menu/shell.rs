use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;
use tracing::{info, warn};

use crate::error::{AppError, Result};
use crate::matcher::TrackMatcher;
use crate::menu::builder::{Action, MenuHandler, Side};
use crate::menu::chooser::Chooser;
use crate::menu::render::TableRenderer;
use crate::session::MatchSession;
use crate::source::PlaylistSource;
use crate::track::Track;

/// Interactive front end over two playlist sources.
pub struct Shell<'a, C, L, R> {
    chooser: &'a C,
    left: L,
    right: R,
    matcher: TrackMatcher,
    renderer: TableRenderer,
    session: MatchSession,
}

impl<'a, C, L, R> Shell<'a, C, L, R>
where
    C: Chooser,
    L: PlaylistSource,
    R: PlaylistSource,
{
    pub fn new(
        chooser: &'a C,
        left: L,
        right: R,
        matcher: TrackMatcher,
        renderer: TableRenderer,
    ) -> Self {
        Self {
            chooser,
            left,
            right,
            matcher,
            renderer,
            session: MatchSession::new(),
        }
    }

    pub fn session(&self) -> &MatchSession {
        &self.session
    }

    async fn authenticate(&mut self, side: Side) -> Result<()> {
        match side {
            Side::Left => self.left.authenticate().await,
            Side::Right => self.right.authenticate().await,
        }
    }

    async fn user_info(&mut self, side: Side) -> Result<()> {
        let info = match side {
            Side::Left => self.left.user_info().await?,
            Side::Right => self.right.user_info().await?,
        };
        println!("{}", info);
        Ok(())
    }

    async fn playlist_info(&mut self, side: Side) -> Result<()> {
        let tracks = match side {
            Side::Left => choose_tracks(self.chooser, &mut self.left, "Which one?").await?,
            Side::Right => choose_tracks(self.chooser, &mut self.right, "Which one?").await?,
        };
        let Some((_, tracks)) = tracks else {
            return Ok(());
        };

        println!("{}", format!("Tracks total: {}", tracks.len()).green());
        for track in &tracks {
            println!("{}", track);
        }
        Ok(())
    }

    async fn match_playlists(&mut self) -> Result<()> {
        let left_message = format!("Choose playlist from {}", self.left.platform());
        let Some((left_name, left_tracks)) =
            choose_tracks(self.chooser, &mut self.left, &left_message).await?
        else {
            return Ok(());
        };

        let right_message = format!("Choose playlist from {}", self.right.platform());
        let Some((right_name, right_tracks)) =
            choose_tracks(self.chooser, &mut self.right, &right_message).await?
        else {
            return Ok(());
        };

        let result = self.matcher.match_named(
            &format!("{}: {}", self.left.platform(), left_name),
            &left_tracks,
            &format!("{}: {}", self.right.platform(), right_name),
            &right_tracks,
        );
        self.renderer.print_matches(&result);
        self.session.push(result);

        Ok(())
    }

    fn choose_result(&self) -> Result<Option<usize>> {
        if self.session.is_empty() {
            warn!("No playlists matched yet, run \"Match playlist tracks\" first");
            return Ok(None);
        }
        if self.session.len() == 1 {
            return Ok(Some(0));
        }

        self.chooser
            .choose("Which match result?", &self.session.labels())
    }

    fn show_matches(&self) -> Result<()> {
        if let Some(result) = self.choose_result()?.and_then(|idx| self.session.get(idx)) {
            self.renderer.print_matches(result);
        }
        Ok(())
    }

    fn link_by_hand(&mut self) -> Result<()> {
        let Some(idx) = self.choose_result()? else {
            return Ok(());
        };
        let result = self
            .session
            .get(idx)
            .ok_or_else(|| AppError::NotFound(format!("match result #{}", idx)))?;

        if result.only_left().is_empty() || result.only_right().is_empty() {
            println!("{}", "Nothing left to link by hand".yellow());
            return Ok(());
        }

        let width = self.renderer.width() * 2;
        let Some(left) = pick_track(
            self.chooser,
            &format!("Unmatched in {}", result.left_name),
            result.only_left(),
            width,
        )?
        else {
            return Ok(());
        };
        let Some(right) = pick_track(
            self.chooser,
            &format!("Link \"{}\" to", left.title),
            result.only_right(),
            width,
        )?
        else {
            return Ok(());
        };

        let result = self
            .session
            .get_mut(idx)
            .ok_or_else(|| AppError::NotFound(format!("match result #{}", idx)))?;
        result.link(&left, &right)?;
        self.renderer.print_matches(result);

        Ok(())
    }
}

impl<C, L, R> MenuHandler for Shell<'_, C, L, R>
where
    C: Chooser,
    L: PlaylistSource,
    R: PlaylistSource,
{
    async fn handle(&mut self, action: Action) -> Result<()> {
        match action {
            Action::Authenticate(side) => self.authenticate(side).await,
            Action::UserInfo(side) => self.user_info(side).await,
            Action::PlaylistInfo(side) => self.playlist_info(side).await,
            Action::MatchPlaylists => self.match_playlists().await,
            Action::ShowMatches => self.show_matches(),
            Action::LinkByHand => self.link_by_hand(),
        }
    }
}

/// Ask for one of the source's playlists and fetch its tracks.
async fn choose_tracks<C, S>(
    chooser: &C,
    source: &mut S,
    message: &str,
) -> Result<Option<(String, Vec<Track>)>>
where
    C: Chooser,
    S: PlaylistSource,
{
    let names = source.get_playlist_names().await?;
    let Some(idx) = chooser.choose(message, &names)? else {
        return Ok(None);
    };
    let name = names
        .get(idx)
        .cloned()
        .ok_or_else(|| AppError::Prompt(format!("no playlist #{} to choose from", idx)))?;

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(format!("Fetching {} from {}", name, source.platform()));
    pb.enable_steady_tick(Duration::from_millis(100));

    let tracks = source.get_playlist_tracks(&name).await;
    pb.finish_and_clear();

    let tracks = tracks?;
    info!("{} playlist {}: {} tracks", source.platform(), name, tracks.len());
    Ok(Some((name, tracks)))
}

fn pick_track<C: Chooser>(
    chooser: &C,
    message: &str,
    tracks: &[Track],
    width: usize,
) -> Result<Option<Track>> {
    let labels: Vec<String> = tracks.iter().map(|t| t.to_brief_str(width)).collect();
    Ok(chooser
        .choose(message, &labels)?
        .and_then(|idx| tracks.get(idx))
        .cloned())
}
