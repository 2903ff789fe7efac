//! Tabs Example - responsive tab overflow
//!
//! Builds a tab strip, activates the built-in components and prints which
//! tabs stay in the bar and which move into the "More" dropdown as the
//! viewport narrows. The last line uses the current terminal width.
//!
//! Run with: cargo run --example tabs
//! Watch:    cargo run --example tabs -- --watch   (resize the terminal for 10s)
//! Verbose:  SPARK_COMPONENTS_LOG=spark_components=trace cargo run --example tabs

use std::time::{Duration, Instant};

use spark_components::components::builtin_components;
use spark_components::viewport::poll_resize;
use spark_components::widgets::{ResponsiveTabs, TabMode};
use spark_components::{logging, Node, Page, ThemeConfig, Viewport};

const LABELS: [&str; 5] = ["Home", "Profile", "Messages", "Settings", "Activity Log"];

fn tab(label: &str) -> Node {
    Node::new("li").child(
        Node::new("a")
            .style("padding-left", "1px")
            .style("padding-right", "1px")
            .text(label),
    )
}

fn render(page: &Page, tabs: &ResponsiveTabs) -> String {
    let doc = &page.document;
    let bar: Vec<&str> = tabs
        .items()
        .iter()
        .zip(LABELS)
        .filter(|&(&item, _)| !doc.is_hidden(item))
        .map(|(_, label)| label)
        .collect();
    let menu: Vec<&str> = tabs
        .dropdown_items()
        .iter()
        .zip(LABELS)
        .filter(|&(&item, _)| !doc.is_hidden(item))
        .map(|(_, label)| label)
        .collect();

    match tabs.mode() {
        TabMode::Partial(_) => format!("[{}] [More ▾] → {}", bar.join("] ["), menu.join(", ")),
        _ => format!("[{}]", bar.join("] [")),
    }
}

fn main() -> spark_components::Result<()> {
    logging::init("spark_components=info");

    let config = ThemeConfig::load_default()?;
    let mut components = builtin_components()?;
    config.apply(components.registry_mut())?;

    let mut page = Page::new()
        .with_viewport(config.viewport())
        .with_environment(config.environment()?);
    let root = page.document.root();
    let strip = page.document.insert(
        root,
        Node::new("div").class("nav-tabs-horizontal").child(
            Node::new("ul")
                .class("nav nav-tabs")
                .children(LABELS.map(tab))
                .child(
                    Node::new("li").class("dropdown").child(Node::new("a").text("More ▾")).child(
                        Node::new("ul")
                            .class("dropdown-menu")
                            .style("position", "absolute")
                            .children(LABELS.map(tab)),
                    ),
                ),
        ),
    );
    components.activate(&mut page, None);

    let Some(tabs) = page.widget::<ResponsiveTabs>(strip) else {
        println!("no tab strip found");
        return Ok(());
    };
    println!("=== spark-components Tabs Example ===\n");
    println!("breakpoints: {:?}\n", tabs.breakpoints());

    for width in [60.0, 45.0, 30.0, 20.0, 12.0] {
        page.resize(width, 24.0);
        println!("{width:>5}  {:<14} {}", format!("{:?}", tabs.mode()), render(&page, &tabs));
    }

    match Viewport::from_terminal() {
        Ok(terminal) => {
            page.resize(terminal.width, terminal.height);
            println!("\nterminal ({} cols): {}", terminal.width, render(&page, &tabs));
        }
        Err(err) => println!("\nno terminal size: {err}"),
    }

    if std::env::args().any(|arg| arg == "--watch") {
        let deadline = Instant::now() + Duration::from_secs(10);
        while Instant::now() < deadline {
            if let Some(viewport) = poll_resize(Duration::from_millis(250))? {
                page.resize(viewport.width, viewport.height);
                println!("{:>5}  {}", viewport.width, render(&page, &tabs));
            }
        }
    }
    Ok(())
}
