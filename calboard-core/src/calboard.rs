//! Top-level calendar state for a host UI.
//!
//! `Calboard` owns the event store together with the view state (which
//! page of which view is shown), the event form and the drag controller.
//! The host forwards user input to it and renders [`Calboard::grid`].

use chrono::NaiveDate;
use log::{debug, warn};

use crate::change::EventChange;
use crate::config::CalboardConfig;
use crate::drag::{DragController, DragPayload};
use crate::error::{CalboardError, CalboardResult};
use crate::event::Event;
use crate::form::{EventForm, Submitted};
use crate::grid::{Grid, GridView};
use crate::logging;
use crate::store::{EventStore, SubscriptionId};

#[derive(Debug)]
pub struct Calboard {
    config: CalboardConfig,
    store: EventStore,
    view: GridView,
    reference: NaiveDate,
    today: NaiveDate,
    form: EventForm,
    drag: DragController,
}

impl Calboard {
    /// Load the user's config, writing a commented default file if none exists.
    pub fn load() -> CalboardResult<Self> {
        let config_path = CalboardConfig::config_path()?;

        if !config_path.exists() {
            if let Err(e) = CalboardConfig::create_default_config(&config_path) {
                warn!("Could not create default config: {}", e);
            }
        }

        let config = CalboardConfig::load_from(&config_path)?;

        if let Err(e) = logging::init_logging(&config.log_level) {
            warn!("Could not initialize logging: {}", e);
        }

        Self::new(config)
    }

    /// Start on today's page in the configured default view.
    pub fn new(config: CalboardConfig) -> CalboardResult<Self> {
        let today = config.today()?;
        Self::starting_at(config, today)
    }

    /// Start with `today` as both the current date and the shown page.
    pub fn starting_at(config: CalboardConfig, today: NaiveDate) -> CalboardResult<Self> {
        config.validate()?;
        let form = EventForm::new(config.palette()?, config.full_day_default);
        let drag = DragController::new(config.drop_policy());

        Ok(Calboard {
            view: config.default_view,
            reference: today,
            today,
            store: EventStore::new(),
            form,
            drag,
            config,
        })
    }

    pub fn config(&self) -> &CalboardConfig {
        &self.config
    }

    pub fn store(&self) -> &EventStore {
        &self.store
    }

    pub fn form(&self) -> &EventForm {
        &self.form
    }

    /// Field input goes straight to the form.
    pub fn form_mut(&mut self) -> &mut EventForm {
        &mut self.form
    }

    pub fn drag(&self) -> &DragController {
        &self.drag
    }

    pub fn view(&self) -> GridView {
        self.view
    }

    pub fn reference(&self) -> NaiveDate {
        self.reference
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    /// The grid for the current view and page.
    pub fn grid(&self) -> Grid<'_> {
        Grid::build(self.view, self.reference, self.store.events()).with_today(self.today)
    }

    pub fn subscribe(&mut self, callback: impl FnMut(&EventChange) + 'static) -> SubscriptionId {
        self.store.subscribe(callback)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.store.unsubscribe(id)
    }

    // NAVIGATION:

    pub fn set_view(&mut self, view: GridView) {
        self.view = view;
    }

    pub fn next(&mut self) {
        self.reference = self.view.step(self.reference, true);
    }

    pub fn previous(&mut self) {
        self.reference = self.view.step(self.reference, false);
    }

    pub fn go_to(&mut self, date: NaiveDate) {
        self.reference = date;
    }

    /// Re-read the clock and show today's page.
    pub fn go_to_today(&mut self) -> CalboardResult<()> {
        self.today = self.config.today()?;
        self.reference = self.today;
        Ok(())
    }

    // EVENTS:

    pub fn add_event(&mut self, event: Event) -> CalboardResult<()> {
        self.store.add(event)
    }

    pub fn delete_event(&mut self, id: &str) -> CalboardResult<Event> {
        if self.drag.active().is_some_and(|p| p.event_id() == id) {
            self.drag.cancel();
        }
        self.store.remove(id)
    }

    // FORM:

    pub fn open_create_form(&mut self, day: NaiveDate) {
        self.form.open_create(day);
    }

    pub fn open_edit_form(&mut self, id: &str) -> CalboardResult<()> {
        let event = self
            .store
            .get(id)
            .ok_or_else(|| CalboardError::EventNotFound(id.to_string()))?;
        self.form.open_edit(event);
        Ok(())
    }

    pub fn submit_form(&mut self) -> CalboardResult<Option<Submitted>> {
        self.form.submit(&mut self.store)
    }

    pub fn cancel_form(&mut self) {
        self.form.cancel();
    }

    // DRAG:

    pub fn start_drag(&mut self, id: &str) -> CalboardResult<DragPayload> {
        let event = self
            .store
            .get(id)
            .ok_or_else(|| CalboardError::EventNotFound(id.to_string()))?;
        Ok(self.drag.start(event))
    }

    pub fn drop_on(&mut self, target: NaiveDate) -> CalboardResult<Event> {
        self.drag.drop_on(target, &mut self.store)
    }

    /// Drop a payload that travelled through the host as JSON.
    pub fn drop_json(&mut self, json: &str, target: NaiveDate) -> CalboardResult<Event> {
        self.drag.cancel();
        self.drag.drop_json(json, target, &mut self.store)
    }

    pub fn cancel_drag(&mut self) {
        if let Some(payload) = self.drag.cancel() {
            debug!("Drag cancelled for {}", payload.event_id());
        }
    }
}
