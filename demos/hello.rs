//! Render a static tree, re-render it with a changed list, print the markup.
//!
//! ```sh
//! RUST_LOG=fiber_vdom=debug cargo run --example hello
//! ```

use fiber_vdom::prelude::*;
use tracing_subscriber::EnvFilter;

fn app(items: &[&str]) -> Element {
    Element::host("div")
        .child(Element::host("h1").text("hello"))
        .child(
            Element::host("ul").children(items.iter().map(|item| Element::host("li").text(*item))),
        )
}

fn main() -> Result<(), RenderError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut doc = MemoryDocument::new();
    let container = doc.create_container("root");
    let mut root = create_root::<MemoryDocument>(container);

    let stats = root.render(&mut doc, app(&["foo", "bar"]))?;
    println!("{}", doc.to_markup(container));
    println!("{stats:?}");

    let stats = root.render(&mut doc, app(&["foo", "baz", "qux"]))?;
    println!("{}", doc.to_markup(container));
    println!("{stats:?}");

    Ok(())
}
