//! A counter component driven by dispatched click events, rendered
//! cooperatively in small slices.
//!
//! ```sh
//! RUST_LOG=fiber_vdom=trace cargo run --example counter
//! ```

use std::cell::Cell;
use std::rc::Rc;

use fiber_vdom::prelude::*;
use tracing_subscriber::EnvFilter;

fn counter(props: &Props) -> Element {
    let count = props.get("count").and_then(PropValue::as_int).copied().unwrap_or(0);
    let button = match props.get("onIncrement").and_then(PropValue::as_listener) {
        Some(listener) => Element::host("button").listener("onClick", listener.clone()),
        None => Element::host("button"),
    };
    Element::host("section")
        .child(Element::host("p").text(format!("count: {count}")))
        .child(button.text("+1"))
}

fn view(count: i64, on_increment: &Listener) -> Element {
    Element::component(Component::new(counter))
        .prop("count", count)
        .listener("onIncrement", on_increment.clone())
}

fn main() -> Result<(), RenderError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut doc = MemoryDocument::new();
    let container = doc.create_container("root");
    let mut root = Root::<MemoryDocument>::with_config(container, ReconcilerConfig::small());

    let clicks = Rc::new(Cell::new(0_i64));
    let on_increment = {
        let clicks = clicks.clone();
        Listener::new(move |_| clicks.set(clicks.get() + 1))
    };

    let _ = root.render(&mut doc, view(0, &on_increment))?;
    println!("{}", doc.to_markup(container));

    let button = doc
        .children(container)
        .first()
        .and_then(|&section| doc.children(section).get(1).copied());

    for _ in 0..3 {
        if let Some(button) = button {
            doc.dispatch(button, &Event::new("click"));
        }

        // Drive the render one slice at a time, as an idle callback would.
        root.schedule(view(clicks.get(), &on_increment));
        let stats = loop {
            if let Some(stats) = root.tick_slice(&mut doc)? {
                break stats;
            }
        };
        println!(
            "{}  ({} units, {} updates)",
            doc.to_markup(container),
            stats.units_of_work,
            stats.updates
        );
    }

    Ok(())
}
