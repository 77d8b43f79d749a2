//! Application state and input handling for the terminal browser.
//!
//! Network work runs on spawned tokio tasks; each task reports back through a
//! [`Message`] on an unbounded channel. Only [`App::handle_message`], called
//! from the UI loop, mutates the view-models, so they need no locking.

use crate::config::{Config, Locale};
use crate::detail::DetailView;
use crate::error::CatalogError;
use crate::fetch::Catalog;
use crate::listing::{ListView, PageRequest};
use crate::models::{Detail, Page};
use crate::toast::{Toast, ToastKind, ToastQueue};
use crate::utils::{decode_thumb, format_name, sprite_rows};
use crossterm::event::{KeyCode, KeyEvent};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{error, info, warn};

/// Completion of a background catalog call.
#[derive(Debug)]
pub enum Message {
    Page {
        generation: u64,
        result: Result<Page, CatalogError>,
    },
    Detail {
        id: u32,
        result: Result<Detail, CatalogError>,
    },
    Lookup {
        name: String,
        result: Result<Detail, CatalogError>,
    },
    Sprite {
        id: u32,
        result: Result<Vec<u8>, CatalogError>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Search,
    Goto,
}

pub struct App<C> {
    catalog: Arc<C>,
    tx: UnboundedSender<Message>,
    pub list: ListView,
    pub detail: Option<DetailView>,
    pub toasts: ToastQueue,
    pub mode: InputMode,
    pub search_query: String,
    pub goto_query: String,
    pub show_help: bool,
    pub should_quit: bool,
    locale: Locale,
    // bumped on refresh so pages requested before it are discarded
    generation: u64,
    // name of the goto lookup whose result may still open a detail view
    pending_lookup: Option<String>,
    sprites: HashMap<u32, image::RgbaImage>,
    sprite_requests: HashSet<u32>,
}

impl<C: Catalog + 'static> App<C> {
    pub fn new(catalog: Arc<C>, config: &Config) -> (Self, UnboundedReceiver<Message>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let app = Self {
            catalog,
            tx,
            list: ListView::new(config.page_size),
            detail: None,
            toasts: ToastQueue::default(),
            mode: InputMode::Normal,
            search_query: String::new(),
            goto_query: String::new(),
            show_help: false,
            should_quit: false,
            locale: config.locale,
            generation: 0,
            pending_lookup: None,
            sprites: HashMap::new(),
            sprite_requests: HashSet::new(),
        };
        (app, rx)
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    /// Resets the list and requests the first page.
    pub fn refresh(&mut self) {
        self.generation += 1;
        self.search_query.clear();
        if let Some(req) = self.list.refresh() {
            self.spawn_page(req);
        }
    }

    pub fn load_more(&mut self) {
        if let Some(req) = self.list.begin_load() {
            self.spawn_page(req);
        }
    }

    pub fn open_selected(&mut self) {
        let Some(id) = self.list.selected().map(|s| s.id) else {
            return;
        };
        self.pending_lookup = None;
        self.detail = Some(DetailView::open(id, self.locale));
        let catalog = self.catalog.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = catalog.fetch_by_id(id).await;
            let _ = tx.send(Message::Detail { id, result });
        });
    }

    pub fn close_detail(&mut self) {
        self.detail = None;
    }

    fn spawn_page(&self, req: PageRequest) {
        let catalog = self.catalog.clone();
        let tx = self.tx.clone();
        let generation = self.generation;
        tokio::spawn(async move {
            let result = catalog.fetch_page(req.offset, req.limit).await;
            let _ = tx.send(Message::Page { generation, result });
        });
    }

    fn spawn_lookup(&mut self, name: String) {
        self.pending_lookup = Some(name.clone());
        let catalog = self.catalog.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = catalog.fetch_by_name(&name).await;
            let _ = tx.send(Message::Lookup { name, result });
        });
    }

    /// Downloads the sprite for `id` once; later calls for the same id are no-ops.
    fn spawn_sprite(&mut self, id: u32, url: String) {
        if !self.sprite_requests.insert(id) {
            return;
        }
        let catalog = self.catalog.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = catalog.fetch_sprite(&url).await;
            let _ = tx.send(Message::Sprite { id, result });
        });
    }

    /// Requests the thumbnail of the highlighted list row.
    fn request_preview_sprite(&mut self) {
        if let Some(s) = self.list.selected() {
            let (id, url) = (s.id, s.image.clone().unwrap_or_default());
            self.spawn_sprite(id, url);
        }
    }

    pub fn handle_message(&mut self, msg: Message) {
        match msg {
            Message::Page { generation, result } => {
                if generation != self.generation {
                    return;
                }
                match result {
                    Ok(page) => {
                        info!(
                            count = page.items.len(),
                            offset = self.list.cursor(),
                            "page loaded"
                        );
                        self.list.apply_page(page);
                        if self.detail.is_none() {
                            self.request_preview_sprite();
                        }
                    }
                    Err(e) => {
                        error!(error = %e, "error loading pokémon");
                        self.list.apply_failure();
                        self.toasts
                            .push(Toast::new(ToastKind::Error, "Could not load Pokémon"));
                    }
                }
            }
            Message::Detail { id, result } => {
                let Some(view) = self.detail.as_mut() else {
                    return;
                };
                if view.id() != id {
                    return;
                }
                match result {
                    Ok(detail) => {
                        let got = detail.id;
                        if view.apply(detail) {
                            let url = view.image_url().to_string();
                            self.spawn_sprite(id, url);
                        } else {
                            warn!(id, got, "detail response is for another pokémon");
                            view.apply_failure();
                        }
                    }
                    Err(e) => {
                        error!(id, error = %e, "error loading pokémon details");
                        view.apply_failure();
                    }
                }
            }
            Message::Lookup { name, result } => {
                if self.pending_lookup.as_deref() != Some(name.as_str()) {
                    return;
                }
                self.pending_lookup = None;
                match result {
                    Ok(detail) => {
                        let view = DetailView::loaded(detail, self.locale);
                        let (id, url) = (view.id(), view.image_url().to_string());
                        self.detail = Some(view);
                        self.spawn_sprite(id, url);
                    }
                    Err(e) => {
                        warn!(name = %name, error = %e, "lookup failed");
                        self.toasts.push(Toast::new(
                            ToastKind::Error,
                            format!("No Pokémon named '{}'", name),
                        ));
                    }
                }
            }
            Message::Sprite { id, result } => match result {
                Ok(bytes) => match decode_thumb(&bytes) {
                    Some(thumb) => {
                        self.sprites.insert(id, thumb);
                    }
                    None => warn!(id, "sprite is not a decodable image"),
                },
                Err(e) => warn!(id, error = %e, "sprite unavailable"),
            },
        }
    }

    /// Sprite pixels for `id` at `w` x `h`, if the image has been downloaded.
    pub fn sprite_pixels(&self, id: u32, w: u32, h: u32) -> Option<Vec<Vec<(u8, u8, u8)>>> {
        self.sprites.get(&id).map(|thumb| sprite_rows(thumb, w, h))
    }

    pub fn tick(&mut self, now: Instant) {
        self.toasts.tick(now);
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        match self.mode {
            InputMode::Search => self.handle_search_key(key),
            InputMode::Goto => self.handle_goto_key(key),
            InputMode::Normal => self.handle_normal_key(key),
        }
        // the selection may have moved
        if self.detail.is_none() {
            self.request_preview_sprite();
        }
    }

    fn handle_search_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter | KeyCode::Esc => self.mode = InputMode::Normal,
            KeyCode::Backspace => {
                self.search_query.pop();
                self.list.set_filter(&self.search_query);
            }
            KeyCode::Char(c) => {
                self.search_query.push(c);
                self.list.set_filter(&self.search_query);
            }
            _ => {}
        }
    }

    fn handle_goto_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                self.goto_query.clear();
                self.mode = InputMode::Normal;
            }
            KeyCode::Enter => {
                let name = std::mem::take(&mut self.goto_query);
                self.mode = InputMode::Normal;
                if !name.trim().is_empty() {
                    self.spawn_lookup(name.trim().to_string());
                }
            }
            KeyCode::Backspace => {
                self.goto_query.pop();
            }
            KeyCode::Char(c) => self.goto_query.push(c),
            _ => {}
        }
    }

    fn handle_normal_key(&mut self, key: KeyEvent) {
        if self.show_help {
            // any key closes the help overlay
            self.show_help = false;
            return;
        }
        if self.detail.is_some() {
            match key.code {
                KeyCode::Char('q') => self.should_quit = true,
                KeyCode::Esc | KeyCode::Backspace | KeyCode::Left => self.close_detail(),
                KeyCode::Char('f') => {
                    if let Some(view) = self.detail.as_mut() {
                        if view.detail().is_some() {
                            let toast = view.toggle_favorite();
                            self.toasts.push(toast);
                        }
                    }
                }
                KeyCode::Char('s') => {
                    if let Some(toast) = self.detail.as_ref().and_then(|v| v.share()) {
                        self.toasts.push(toast);
                    }
                }
                KeyCode::Char('?') | KeyCode::F(1) => self.show_help = true,
                _ => {}
            }
            return;
        }
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('?') | KeyCode::F(1) => self.show_help = true,
            KeyCode::Char('/') => {
                self.mode = InputMode::Search;
                self.search_query.clear();
                self.list.set_filter("");
            }
            KeyCode::Char('g') => {
                self.mode = InputMode::Goto;
                self.goto_query.clear();
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if self.list.next() {
                    self.load_more();
                }
            }
            KeyCode::Up | KeyCode::Char('k') => self.list.previous(),
            KeyCode::Char('n') => self.load_more(),
            KeyCode::Char('r') => self.refresh(),
            KeyCode::Enter | KeyCode::Right => self.open_selected(),
            KeyCode::Char('o') => {
                let msg = match self.locale {
                    Locale::En => "Filters coming soon",
                    Locale::Es => "Funcionalidad de filtros próximamente",
                };
                self.toasts.push(Toast::new(ToastKind::Info, msg));
            }
            _ => {}
        }
    }

    /// Title shown above the detail panel.
    pub fn detail_title(&self) -> String {
        match self.detail.as_ref().and_then(|v| v.detail().map(|d| (v, d))) {
            Some((view, d)) => {
                let heart = if view.is_favorite() { " ♥" } else { "" };
                format!("{} #{:03}{}", format_name(&d.name), d.id, heart)
            }
            None => "Details".to_string(),
        }
    }
}
