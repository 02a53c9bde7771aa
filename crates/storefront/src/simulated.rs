//! In-process model of the storefront.
//!
//! [`SimulatedStore`] implements [`Driver`] against a state machine that
//! renders each screen as HTML and resolves locators with `scraper`, so page
//! objects run unchanged and without a browser. Knobs on
//! [`SimulatedOptions`] reproduce the timing and interaction hazards the
//! live site shows: late rendering, obstructed controls, lost native clicks
//! and failing captures.

use crate::catalog::{format_price, product_by_slug, Product, PRODUCTS};
use crate::config::{join_url, DEFAULT_BASE_URL, DEFAULT_PASSWORD};
use crate::driver::{Driver, ElementHandle, Screenshot, SharedDriver};
use crate::harness::SessionProvider;
use crate::locator::Locator;
use crate::pages::Screen;
use crate::result::{StorefrontError, StorefrontResult};
use async_trait::async_trait;
use base64::Engine as _;
use scraper::{Html, Selector};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::debug;

/// Accounts the storefront knows
pub const KNOWN_USERS: [&str; 6] = [
    "standard_user",
    "locked_out_user",
    "problem_user",
    "performance_glitch_user",
    "error_user",
    "visual_user",
];

/// Account rejected with the locked-out message
pub const LOCKED_OUT_USER: &str = "locked_out_user";

/// Shown when the credentials match no account
pub const CREDENTIALS_MISMATCH: &str =
    "Epic sadface: Username and password do not match any user in this service";

/// Shown for [`LOCKED_OUT_USER`]
pub const LOCKED_OUT: &str = "Epic sadface: Sorry, this user has been locked out.";

/// Thank-you headline on the confirmation screen
pub const ORDER_COMPLETE_HEADER: &str = "Thank you for your order!";

const BLANK_URL: &str = "about:blank";

/// Tax rate applied on the overview, in percent
const TAX_PERCENT: u32 = 8;

/// 1x1 PNG returned by screenshots
const PIXEL_PNG: &str =
    "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAQAAAC1HAwCAAAAC0lEQVR42mNkYAAAAAYAAjCB0C8AAAAASUVORK5CYII=";

/// Behaviour knobs for a simulated store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulatedOptions {
    /// Address the store answers on
    pub base_url: String,
    /// Lookups that see an empty document after each screen change
    pub render_lag: u32,
    /// Element ids or `data-test` values covered by an overlay
    pub obstructed: Vec<String>,
    /// Native clicks on the checkout continue button are lost
    pub unreliable_continue: bool,
    /// Screenshots fail
    pub failing_screenshots: bool,
}

impl Default for SimulatedOptions {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            render_lag: 0,
            obstructed: Vec::new(),
            unreliable_continue: false,
            failing_screenshots: false,
        }
    }
}

impl SimulatedOptions {
    /// Create options with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Return an empty document for `lookups` lookups after each screen change
    #[must_use]
    pub const fn with_render_lag(mut self, lookups: u32) -> Self {
        self.render_lag = lookups;
        self
    }

    /// Cover the element with this id or `data-test` value
    #[must_use]
    pub fn with_obstruction(mut self, key: impl Into<String>) -> Self {
        self.obstructed.push(key.into());
        self
    }

    /// Drop native clicks on the checkout continue button
    #[must_use]
    pub const fn with_unreliable_continue(mut self) -> Self {
        self.unreliable_continue = true;
        self
    }

    /// Make every screenshot fail
    #[must_use]
    pub const fn with_failing_screenshots(mut self) -> Self {
        self.failing_screenshots = true;
        self
    }
}

/// Snapshot of a matched element
#[derive(Debug, Clone)]
struct Node {
    tag: String,
    id: Option<String>,
    data_test: Option<String>,
    classes: Vec<String>,
    text: String,
    disabled: bool,
}

impl Node {
    fn key(&self) -> Option<&str> {
        self.id.as_deref().or(self.data_test.as_deref())
    }

    fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    fn is_editable(&self) -> bool {
        self.tag == "input" || self.tag == "textarea"
    }
}

#[derive(Debug)]
struct StoreState {
    url: String,
    screen: Option<Screen>,
    user: Option<String>,
    cart: Vec<&'static Product>,
    fields: HashMap<String, String>,
    error: Option<String>,
    nodes: HashMap<String, Node>,
    lag_remaining: u32,
    navigations: Vec<String>,
    closed: bool,
}

/// Simulated storefront session
#[derive(Debug)]
pub struct SimulatedStore {
    options: SimulatedOptions,
    obstructed: HashSet<String>,
    next_node: AtomicU64,
    state: Mutex<StoreState>,
}

impl Default for SimulatedStore {
    fn default() -> Self {
        Self::new(SimulatedOptions::default())
    }
}

impl SimulatedStore {
    /// Open a session on a blank page
    #[must_use]
    pub fn new(options: SimulatedOptions) -> Self {
        let obstructed = options.obstructed.iter().cloned().collect();
        Self {
            options,
            obstructed,
            next_node: AtomicU64::new(1),
            state: Mutex::new(StoreState {
                url: BLANK_URL.to_string(),
                screen: None,
                user: None,
                cart: Vec::new(),
                fields: HashMap::new(),
                error: None,
                nodes: HashMap::new(),
                lag_remaining: 0,
                navigations: Vec::new(),
                closed: false,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, StoreState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn live(&self) -> StorefrontResult<MutexGuard<'_, StoreState>> {
        let state = self.lock();
        if state.closed {
            return Err(StorefrontError::Navigation {
                url: state.url.clone(),
                message: "session closed".to_string(),
            });
        }
        Ok(state)
    }

    /// Screen currently shown, `None` on a blank or foreign page
    #[must_use]
    pub fn screen(&self) -> Option<Screen> {
        self.lock().screen
    }

    /// Names of the products in the cart, in the order they were added
    #[must_use]
    pub fn cart_contents(&self) -> Vec<&'static str> {
        self.lock().cart.iter().map(|p| p.name).collect()
    }

    /// Logged-in account
    #[must_use]
    pub fn user(&self) -> Option<String> {
        self.lock().user.clone()
    }

    /// Every address loaded through [`Driver::navigate`]
    #[must_use]
    pub fn navigations(&self) -> Vec<String> {
        self.lock().navigations.clone()
    }

    /// Whether [`Driver::close`] was called
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.lock().closed
    }

    /// `id` or `data-test` of the element behind a live handle
    #[must_use]
    pub fn element_key(&self, element: &ElementHandle) -> Option<String> {
        let state = self.lock();
        Self::node(&state, element)
            .ok()
            .and_then(|node| node.key().map(str::to_string))
    }

    fn url_of(&self, screen: Screen) -> String {
        join_url(&self.options.base_url, screen.path())
    }

    /// Switch screens: new document, fresh handles, cleared form state.
    fn show(&self, state: &mut StoreState, screen: Screen) {
        debug!(%screen, "simulated screen change");
        state.screen = Some(screen);
        state.url = self.url_of(screen);
        state.fields.clear();
        state.error = None;
        state.lag_remaining = self.options.render_lag;
        state.nodes.clear();
    }

    /// Same screen, new DOM: outstanding handles go stale.
    fn mutate(state: &mut StoreState) {
        state.nodes.clear();
    }

    fn node(state: &StoreState, element: &ElementHandle) -> StorefrontResult<Node> {
        state
            .nodes
            .get(element.id())
            .cloned()
            .ok_or_else(|| StorefrontError::StaleElement {
                id: element.id().to_string(),
            })
    }

    fn is_obstructed(&self, node: &Node) -> bool {
        node.key().is_some_and(|key| self.obstructed.contains(key))
    }

    fn activate(&self, state: &mut StoreState, node: &Node) {
        let Some(screen) = state.screen else {
            return;
        };
        if node.has_class("shopping_cart_link") {
            self.show(state, Screen::Cart);
            return;
        }

        let key = node.key().unwrap_or_default();
        if let Some(slug) = key.strip_prefix("add-to-cart-") {
            if let Some(product) = product_by_slug(slug) {
                if !state.cart.iter().any(|p| p.name == product.name) {
                    state.cart.push(product);
                }
                Self::mutate(state);
            }
            return;
        }
        if let Some(slug) = key.strip_prefix("remove-") {
            if let Some(product) = product_by_slug(slug) {
                state.cart.retain(|p| p.name != product.name);
                Self::mutate(state);
            }
            return;
        }

        match (screen, key) {
            (Screen::Login, "login-button") => self.submit_login(state),
            (Screen::Cart, "checkout") => self.show(state, Screen::CheckoutInfo),
            (Screen::Cart, "continue-shopping") | (Screen::CheckoutComplete, "back-to-products") => {
                self.show(state, Screen::Inventory);
            }
            (Screen::CheckoutInfo, "continue") => self.submit_checkout_info(state),
            (Screen::CheckoutInfo, "cancel") => self.show(state, Screen::Cart),
            (Screen::CheckoutOverview, "cancel") => self.show(state, Screen::Inventory),
            (Screen::CheckoutOverview, "finish") => {
                state.cart.clear();
                self.show(state, Screen::CheckoutComplete);
            }
            _ if node.has_class("error-button") => {
                state.error = None;
                Self::mutate(state);
            }
            _ => debug!(key, "click without effect"),
        }
    }

    fn submit_login(&self, state: &mut StoreState) {
        let username = state.fields.get("user-name").cloned().unwrap_or_default();
        let password = state.fields.get("password").cloned().unwrap_or_default();

        let rejection = if username.is_empty() {
            Some("Epic sadface: Username is required")
        } else if password.is_empty() {
            Some("Epic sadface: Password is required")
        } else if !KNOWN_USERS.contains(&username.as_str()) || password != DEFAULT_PASSWORD {
            Some(CREDENTIALS_MISMATCH)
        } else if username == LOCKED_OUT_USER {
            Some(LOCKED_OUT)
        } else {
            None
        };

        match rejection {
            Some(message) => {
                debug!(username = %username, message, "simulated login rejected");
                state.error = Some(message.to_string());
                Self::mutate(state);
            }
            None => {
                state.user = Some(username);
                self.show(state, Screen::Inventory);
            }
        }
    }

    fn submit_checkout_info(&self, state: &mut StoreState) {
        let blank = |field: &str| state.fields.get(field).map_or(true, String::is_empty);
        let missing = if blank("first-name") {
            Some("First Name")
        } else if blank("last-name") {
            Some("Last Name")
        } else if blank("postal-code") {
            Some("Postal Code")
        } else {
            None
        };

        match missing {
            Some(field) => {
                state.error = Some(format!("Error: {field} is required"));
                Self::mutate(state);
            }
            None => self.show(state, Screen::CheckoutOverview),
        }
    }

    fn render(state: &StoreState) -> String {
        let Some(screen) = state.screen else {
            return "<html><body></body></html>".to_string();
        };
        let body = match screen {
            Screen::Login => render_login(state),
            Screen::Inventory => render_inventory(state),
            Screen::Cart => render_cart(state),
            Screen::CheckoutInfo => render_checkout_info(state),
            Screen::CheckoutOverview => render_overview(state),
            Screen::CheckoutComplete => render_complete(state),
        };
        format!("<html><head><title>Swag Labs</title></head><body>{body}</body></html>")
    }
}

fn escape(raw: &str) -> String {
    raw.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

fn error_banner(state: &StoreState) -> String {
    state.error.as_ref().map_or_else(String::new, |message| {
        format!(
            "<div class=\"error-message-container error\"><h3 data-test=\"error\">{}<button class=\"error-button\" data-test=\"error-button\"></button></h3></div>",
            escape(message)
        )
    })
}

fn input(state: &StoreState, id: &str, kind: &str) -> String {
    let value = state.fields.get(id).map_or_else(String::new, |v| escape(v));
    format!("<input id=\"{id}\" data-test=\"{id}\" type=\"{kind}\" value=\"{value}\">")
}

fn header(state: &StoreState, title: &str) -> String {
    let badge = if state.cart.is_empty() {
        String::new()
    } else {
        format!(
            "<span class=\"shopping_cart_badge\" data-test=\"shopping-cart-badge\">{}</span>",
            state.cart.len()
        )
    };
    format!(
        "<div class=\"header_container\" id=\"header_container\">\
         <div class=\"primary_header\"><div class=\"app_logo\">Swag Labs</div>\
         <div class=\"shopping_cart_container\" id=\"shopping_cart_container\">\
         <a class=\"shopping_cart_link\" data-test=\"shopping-cart-link\">{badge}</a></div></div>\
         <div class=\"header_secondary_container\"><span class=\"title\" data-test=\"title\">{}</span></div></div>",
        escape(title)
    )
}

fn item_row(product: &Product, class: &str, control: &str) -> String {
    format!(
        "<div class=\"{class}\"><div class=\"inventory_item_name\">{}</div>\
         <div class=\"inventory_item_price\">{}</div>{control}</div>",
        escape(product.name),
        format_price(product.price_cents)
    )
}

fn button(key: &str, label: &str) -> String {
    format!("<button id=\"{key}\" data-test=\"{key}\">{label}</button>")
}

fn render_login(state: &StoreState) -> String {
    format!(
        "<div class=\"login_logo\">Swag Labs</div><div class=\"login_wrapper\"><form>{}{}{}\
         <input type=\"submit\" id=\"login-button\" data-test=\"login-button\" value=\"Login\"></form></div>",
        input(state, "user-name", "text"),
        input(state, "password", "password"),
        error_banner(state)
    )
}

fn render_inventory(state: &StoreState) -> String {
    let mut items = String::new();
    for product in &PRODUCTS {
        let slug = product.slug();
        let control = if state.cart.iter().any(|p| p.name == product.name) {
            button(&format!("remove-{slug}"), "Remove")
        } else {
            button(&format!("add-to-cart-{slug}"), "Add to cart")
        };
        items.push_str(&item_row(product, "inventory_item", &control));
    }
    format!(
        "{}<div class=\"inventory_list\">{items}</div>",
        header(state, "Products")
    )
}

fn cart_rows(state: &StoreState, removable: bool) -> String {
    let mut rows = String::new();
    for product in &state.cart {
        let control = if removable {
            button(&format!("remove-{}", product.slug()), "Remove")
        } else {
            String::new()
        };
        rows.push_str(&item_row(product, "cart_item", &control));
    }
    rows
}

fn render_cart(state: &StoreState) -> String {
    format!(
        "{}<div class=\"cart_list\">{}</div>{}{}",
        header(state, "Your Cart"),
        cart_rows(state, true),
        button("continue-shopping", "Continue Shopping"),
        button("checkout", "Checkout")
    )
}

fn render_checkout_info(state: &StoreState) -> String {
    format!(
        "{}<form class=\"checkout_info\">{}{}{}{}\
         <input type=\"submit\" id=\"continue\" data-test=\"continue\" value=\"Continue\"></form>{}",
        header(state, "Checkout: Your Information"),
        input(state, "first-name", "text"),
        input(state, "last-name", "text"),
        input(state, "postal-code", "text"),
        error_banner(state),
        button("cancel", "Cancel")
    )
}

fn render_overview(state: &StoreState) -> String {
    let subtotal: u32 = state.cart.iter().map(|p| p.price_cents).sum();
    let tax = (subtotal * TAX_PERCENT + 50) / 100;
    let summary = format!(
        "<div class=\"summary_subtotal_label\">Item total: {}</div>\
         <div class=\"summary_tax_label\">Tax: {}</div>\
         <div class=\"summary_total_label\">Total: {}</div>",
        format_price(subtotal),
        format_price(tax),
        format_price(subtotal + tax)
    );
    format!(
        "{}<div class=\"cart_list\">{}</div><div class=\"summary_info\">{summary}</div>{}{}",
        header(state, "Checkout: Overview"),
        cart_rows(state, false),
        button("cancel", "Cancel"),
        button("finish", "Finish")
    )
}

fn render_complete(state: &StoreState) -> String {
    format!(
        "{}<div class=\"checkout_complete_container\">\
         <h2 class=\"complete-header\">{ORDER_COMPLETE_HEADER}</h2>\
         <div class=\"complete-text\">Your order has been dispatched, and will arrive just as fast as the pony can get there!</div>\
         {}</div>",
        header(state, "Checkout: Complete!"),
        button("back-to-products", "Back Home")
    )
}

#[async_trait]
impl Driver for SimulatedStore {
    async fn navigate(&self, url: &str) -> StorefrontResult<()> {
        let mut state = self.live()?;
        state.navigations.push(url.to_string());

        match Screen::detect(&self.options.base_url, url) {
            Some(Screen::Login) => self.show(&mut state, Screen::Login),
            Some(screen) if state.user.is_none() => {
                self.show(&mut state, Screen::Login);
                state.error = Some(format!(
                    "Epic sadface: You can only access '/{}' when you are logged in.",
                    screen.path()
                ));
            }
            Some(screen) => self.show(&mut state, screen),
            None => {
                state.screen = None;
                state.url = url.to_string();
                state.nodes.clear();
            }
        }
        Ok(())
    }

    async fn current_url(&self) -> String {
        self.lock().url.clone()
    }

    async fn find_elements(&self, locator: &Locator) -> StorefrontResult<Vec<ElementHandle>> {
        let css = locator
            .to_css()
            .ok_or_else(|| StorefrontError::UnsupportedLocator {
                locator: locator.to_string(),
            })?;
        let selector = Selector::parse(&css).map_err(|e| StorefrontError::UnsupportedLocator {
            locator: format!("{locator} ({e})"),
        })?;

        let mut state = self.live()?;
        if state.lag_remaining > 0 {
            state.lag_remaining -= 1;
            debug!(%locator, remaining = state.lag_remaining, "document not rendered yet");
            return Ok(Vec::new());
        }

        let document = Html::parse_document(&Self::render(&state));
        let mut handles = Vec::new();
        for element in document.select(&selector) {
            let value = element.value();
            let node = Node {
                tag: value.name().to_string(),
                id: value.attr("id").map(str::to_string),
                data_test: value.attr("data-test").map(str::to_string),
                classes: value.classes().map(str::to_string).collect(),
                text: element.text().collect::<String>().trim().to_string(),
                disabled: value.attr("disabled").is_some(),
            };
            let id = format!("node-{}", self.next_node.fetch_add(1, Ordering::Relaxed));
            state.nodes.insert(id.clone(), node);
            handles.push(ElementHandle::new(id, locator.clone()));
        }
        Ok(handles)
    }

    async fn is_displayed(&self, element: &ElementHandle) -> StorefrontResult<bool> {
        let state = self.live()?;
        Self::node(&state, element).map(|_| true)
    }

    async fn is_interactable(&self, element: &ElementHandle) -> StorefrontResult<bool> {
        let state = self.live()?;
        let node = Self::node(&state, element)?;
        Ok(!node.disabled && !self.is_obstructed(&node))
    }

    async fn click(&self, element: &ElementHandle) -> StorefrontResult<()> {
        let mut state = self.live()?;
        let node = Self::node(&state, element)?;
        if self.is_obstructed(&node) {
            return Err(StorefrontError::action(
                element,
                "click",
                "element click intercepted by overlay",
            ));
        }
        if self.options.unreliable_continue && node.id.as_deref() == Some("continue") {
            debug!(%element, "native click lost");
            return Ok(());
        }
        self.activate(&mut state, &node);
        Ok(())
    }

    async fn script_click(&self, element: &ElementHandle) -> StorefrontResult<()> {
        let mut state = self.live()?;
        let node = Self::node(&state, element)?;
        self.activate(&mut state, &node);
        Ok(())
    }

    async fn clear(&self, element: &ElementHandle) -> StorefrontResult<()> {
        let mut state = self.live()?;
        let node = Self::node(&state, element)?;
        match (node.is_editable(), node.id) {
            (true, Some(id)) => {
                state.fields.insert(id, String::new());
                Ok(())
            }
            _ => Err(StorefrontError::action(
                element,
                "clear",
                "invalid element state: element is not editable",
            )),
        }
    }

    async fn send_keys(&self, element: &ElementHandle, text: &str) -> StorefrontResult<()> {
        let mut state = self.live()?;
        let node = Self::node(&state, element)?;
        match (node.is_editable(), node.id) {
            (true, Some(id)) => {
                state.fields.entry(id).or_default().push_str(text);
                Ok(())
            }
            _ => Err(StorefrontError::action(
                element,
                "type into",
                "element not interactable: element is not editable",
            )),
        }
    }

    async fn text(&self, element: &ElementHandle) -> StorefrontResult<String> {
        let state = self.live()?;
        Self::node(&state, element).map(|node| node.text)
    }

    async fn screenshot(&self) -> StorefrontResult<Screenshot> {
        let _state = self.live()?;
        if self.options.failing_screenshots {
            return Err(StorefrontError::Screenshot {
                message: "capture unavailable".to_string(),
            });
        }
        let data = base64::engine::general_purpose::STANDARD
            .decode(PIXEL_PNG)
            .map_err(|e| StorefrontError::Screenshot {
                message: e.to_string(),
            })?;
        Ok(Screenshot::new(data))
    }

    async fn close(&self) -> StorefrontResult<()> {
        let mut state = self.lock();
        state.closed = true;
        state.nodes.clear();
        Ok(())
    }
}

/// Opens a fresh [`SimulatedStore`] per session and keeps hold of each one.
#[derive(Debug, Default)]
pub struct SimulatedProvider {
    options: SimulatedOptions,
    sessions: Mutex<Vec<Arc<SimulatedStore>>>,
}

impl SimulatedProvider {
    /// Provider whose sessions use `options`
    #[must_use]
    pub fn new(options: SimulatedOptions) -> Self {
        Self {
            options,
            sessions: Mutex::new(Vec::new()),
        }
    }

    /// Every session opened so far
    #[must_use]
    pub fn sessions(&self) -> Vec<Arc<SimulatedStore>> {
        self.sessions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Most recently opened session
    #[must_use]
    pub fn last_session(&self) -> Option<Arc<SimulatedStore>> {
        self.sessions().pop()
    }
}

#[async_trait]
impl SessionProvider for SimulatedProvider {
    async fn open(&self) -> StorefrontResult<SharedDriver> {
        let store = Arc::new(SimulatedStore::new(self.options.clone()));
        self.sessions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Arc::clone(&store));
        debug!("simulated session opened");
        Ok(store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn first(store: &SimulatedStore, locator: Locator) -> ElementHandle {
        store
            .find_elements(&locator)
            .await
            .unwrap()
            .into_iter()
            .next()
            .unwrap_or_else(|| panic!("{locator} not rendered"))
    }

    async fn login(store: &SimulatedStore, username: &str, password: &str) {
        store.navigate(DEFAULT_BASE_URL).await.unwrap();
        let user = first(store, Locator::id("user-name")).await;
        store.send_keys(&user, username).await.unwrap();
        let pass = first(store, Locator::id("password")).await;
        store.send_keys(&pass, password).await.unwrap();
        let button = first(store, Locator::id("login-button")).await;
        store.click(&button).await.unwrap();
    }

    async fn banner(store: &SimulatedStore) -> String {
        let error = first(store, Locator::css("h3[data-test='error']")).await;
        store.text(&error).await.unwrap()
    }

    mod login_tests {
        use super::*;

        #[tokio::test]
        async fn test_standard_user_reaches_inventory() {
            let store = SimulatedStore::default();
            login(&store, "standard_user", "secret_sauce").await;
            assert_eq!(store.screen(), Some(Screen::Inventory));
            assert_eq!(
                store.current_url().await,
                "https://www.saucedemo.com/inventory.html"
            );
            assert_eq!(store.user().as_deref(), Some("standard_user"));
        }

        #[tokio::test]
        async fn test_wrong_password_shows_mismatch() {
            let store = SimulatedStore::default();
            login(&store, "standard_user", "wrong").await;
            assert_eq!(store.screen(), Some(Screen::Login));
            assert_eq!(banner(&store).await, CREDENTIALS_MISMATCH);
        }

        #[tokio::test]
        async fn test_locked_out_user() {
            let store = SimulatedStore::default();
            login(&store, LOCKED_OUT_USER, "secret_sauce").await;
            assert_eq!(banner(&store).await, LOCKED_OUT);
        }

        #[tokio::test]
        async fn test_empty_username_required() {
            let store = SimulatedStore::default();
            login(&store, "", "secret_sauce").await;
            assert_eq!(banner(&store).await, "Epic sadface: Username is required");
        }

        #[tokio::test]
        async fn test_deep_link_requires_login() {
            let store = SimulatedStore::default();
            store
                .navigate("https://www.saucedemo.com/cart.html")
                .await
                .unwrap();
            assert_eq!(store.screen(), Some(Screen::Login));
            assert_eq!(
                banner(&store).await,
                "Epic sadface: You can only access '/cart.html' when you are logged in."
            );
        }
    }

    mod cart_tests {
        use super::*;

        #[tokio::test]
        async fn test_add_and_remove_swap_controls() {
            let store = SimulatedStore::default();
            login(&store, "standard_user", "secret_sauce").await;

            let add = first(&store, Locator::data_test("add-to-cart-sauce-labs-onesie")).await;
            store.script_click(&add).await.unwrap();
            assert_eq!(store.cart_contents(), vec!["Sauce Labs Onesie"]);

            let badge = first(&store, Locator::class_name("shopping_cart_badge")).await;
            assert_eq!(store.text(&badge).await.unwrap(), "1");

            let remove = first(&store, Locator::data_test("remove-sauce-labs-onesie")).await;
            store.click(&remove).await.unwrap();
            assert!(store.cart_contents().is_empty());
            assert!(store
                .find_elements(&Locator::class_name("shopping_cart_badge"))
                .await
                .unwrap()
                .is_empty());
        }

        #[tokio::test]
        async fn test_overview_totals_include_tax() {
            let store = SimulatedStore::default();
            login(&store, "standard_user", "secret_sauce").await;
            for slug in ["sauce-labs-backpack", "sauce-labs-bike-light"] {
                let add = first(&store, Locator::data_test(&format!("add-to-cart-{slug}"))).await;
                store.script_click(&add).await.unwrap();
            }
            store
                .navigate("https://www.saucedemo.com/checkout-step-two.html")
                .await
                .unwrap();
            let total = first(&store, Locator::class_name("summary_total_label")).await;
            assert_eq!(store.text(&total).await.unwrap(), "Total: $43.18");
        }
    }

    mod handle_tests {
        use super::*;

        #[tokio::test]
        async fn test_handles_go_stale_after_mutation() {
            let store = SimulatedStore::default();
            login(&store, "standard_user", "secret_sauce").await;
            let add = first(&store, Locator::data_test("add-to-cart-sauce-labs-backpack")).await;
            store.script_click(&add).await.unwrap();

            let err = store.click(&add).await.unwrap_err();
            assert!(matches!(err, StorefrontError::StaleElement { .. }));
        }

        #[tokio::test]
        async fn test_typing_keeps_handles_valid() {
            let store = SimulatedStore::default();
            store.navigate(DEFAULT_BASE_URL).await.unwrap();
            let user = first(&store, Locator::id("user-name")).await;
            store.send_keys(&user, "standard").await.unwrap();
            store.send_keys(&user, "_user").await.unwrap();
            store.clear(&user).await.unwrap();
            store.send_keys(&user, "visual_user").await.unwrap();
            assert!(store.is_displayed(&user).await.unwrap());
        }

        #[tokio::test]
        async fn test_typing_into_button_fails() {
            let store = SimulatedStore::default();
            store.navigate(DEFAULT_BASE_URL).await.unwrap();
            let title = first(&store, Locator::class_name("login_logo")).await;
            let err = store.send_keys(&title, "x").await.unwrap_err();
            assert!(matches!(err, StorefrontError::Action { .. }));
        }

        #[tokio::test]
        async fn test_xpath_is_unsupported() {
            let store = SimulatedStore::default();
            let err = store
                .find_elements(&Locator::xpath("//button"))
                .await
                .unwrap_err();
            assert!(matches!(err, StorefrontError::UnsupportedLocator { .. }));
        }
    }

    mod knob_tests {
        use super::*;

        #[tokio::test]
        async fn test_render_lag_hides_document() {
            let store = SimulatedStore::new(SimulatedOptions::new().with_render_lag(2));
            store.navigate(DEFAULT_BASE_URL).await.unwrap();
            let locator = Locator::id("login-button");
            assert!(store.find_elements(&locator).await.unwrap().is_empty());
            assert!(store.find_elements(&locator).await.unwrap().is_empty());
            assert_eq!(store.find_elements(&locator).await.unwrap().len(), 1);
        }

        #[tokio::test]
        async fn test_obstructed_element_rejects_native_click() {
            let store =
                SimulatedStore::new(SimulatedOptions::new().with_obstruction("login-button"));
            store.navigate(DEFAULT_BASE_URL).await.unwrap();
            let button = first(&store, Locator::id("login-button")).await;
            assert!(!store.is_interactable(&button).await.unwrap());
            assert!(store.click(&button).await.is_err());
            assert!(store.script_click(&button).await.is_ok());
        }

        #[tokio::test]
        async fn test_failing_screenshots() {
            let store = SimulatedStore::new(SimulatedOptions::new().with_failing_screenshots());
            assert!(matches!(
                store.screenshot().await,
                Err(StorefrontError::Screenshot { .. })
            ));

            let healthy = SimulatedStore::default();
            assert!(healthy.screenshot().await.unwrap().is_png());
        }

        #[tokio::test]
        async fn test_closed_session_rejects_calls() {
            let store = SimulatedStore::default();
            store.close().await.unwrap();
            assert!(store.is_closed());
            assert!(store.navigate(DEFAULT_BASE_URL).await.is_err());
        }
    }

    mod provider_tests {
        use super::*;

        #[tokio::test]
        async fn test_each_open_is_a_fresh_store() {
            let provider = SimulatedProvider::default();
            let first_session = provider.open().await.unwrap();
            first_session.navigate(DEFAULT_BASE_URL).await.unwrap();
            let _second = provider.open().await.unwrap();

            let sessions = provider.sessions();
            assert_eq!(sessions.len(), 2);
            assert_eq!(sessions[0].screen(), Some(Screen::Login));
            assert_eq!(sessions[1].screen(), None);
        }
    }
}
