use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    facets::example_apps::run_chart_feed_demo(std::env::args().skip(1))
}
