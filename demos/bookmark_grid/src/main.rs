use std::rc::Rc;

use anyhow::Context;
use linkshelf_core::*;
use linkshelf_virtual::{ListConfig, ListItem, WindowedList, WindowedListBuilder, deferred_image};
use web_time::Duration;

#[derive(Clone)]
struct Bookmark {
    id: usize,
    title: String,
    host: String,
}

impl ListItem for Bookmark {
    type Id = usize;

    fn id(&self) -> usize {
        self.id
    }
}

const DEFAULT_CONFIG: &str = r#"{ "item_height": 120.0, "buffer_size": 4, "throttle_ms": 100 }"#;

fn load_config() -> anyhow::Result<ListConfig> {
    let raw = match std::env::args().nth(1) {
        Some(path) => {
            std::fs::read_to_string(&path).with_context(|| format!("reading config {path}"))?
        }
        None => DEFAULT_CONFIG.to_string(),
    };
    let config: ListConfig = serde_json::from_str(&raw).context("parsing list config")?;
    config.validate()?;
    Ok(config)
}

fn bookmark_card(b: &Bookmark) -> Node {
    Node::new("article")
        .with_class("bookmark")
        .with_attr("data-id", b.id.to_string())
        .with_child(deferred_image(format!("https://{}/favicon.ico", b.host)))
        .with_child(Node::new("h3").with_text(b.title.clone()))
        .with_child(Node::new("a").with_attr("href", format!("https://{}/", b.host)))
}

fn report(label: &str, list: &WindowedList<Bookmark>, viewport: &ScrollViewport) {
    let range = list.visible_range();
    log::info!(
        "{label}: scroll={} window={}..{} pending_favicons={} {:?}",
        viewport.scroll_offset(),
        range.start,
        range.end,
        list.pending_lazy_loads(),
        list.stats()
    );
}

/// Sleeps until the next timeout is due, then fires it.
fn pump(timers: &Timers) {
    if let Some(due) = timers.next_due() {
        std::thread::sleep(due.saturating_duration_since(timers.now()));
        timers.run_due();
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    log::info!("Starting bookmark grid demo");

    let config = load_config()?;
    let timers = Rc::new(Timers::system());

    let container = Node::new("section").with_class("bookmarks");
    let viewport = ScrollViewport::new(Size::new(960.0, 720.0));
    viewport.set_content(&container);

    let list = WindowedListBuilder::new(&container, &viewport)
        .config(config)
        .timers(timers.clone())
        .build(bookmark_card)?;

    list.set_items((0..1000).map(|id| Bookmark {
        id,
        title: format!("Bookmark #{}", id + 1),
        host: format!("site{id}.example"),
    }));
    report("initial", &list, &viewport);

    // A fling at ~60 events per second: only the first event of each
    // throttle interval gets through.
    for off in [600.0, 650.0, 700.0, 2400.0, 2500.0, 9000.0] {
        viewport.scroll_to(off);
        std::thread::sleep(Duration::from_millis(16));
        timers.run_due();
    }
    report("after fling", &list, &viewport);

    // No trailing pass: the offset already sits at 9000, so catch up by hand.
    pump(&timers);
    list.update_visible_items();
    report("settled", &list, &viewport);

    viewport.resize(Size::new(960.0, 1400.0));
    report("resized", &list, &viewport);

    list.refresh();
    report("refreshed", &list, &viewport);

    list.teardown();
    log::info!(
        "torn down: children={} listeners={} timers={}",
        container.child_count(),
        viewport.listener_count(),
        timers.pending()
    );
    Ok(())
}
