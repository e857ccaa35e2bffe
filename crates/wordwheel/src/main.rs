use relm4::prelude::*;
use wordwheel::config;
use wordwheel::gui::app::AppModel;
use wordwheel::sys::runtime;

fn main() {
    env_logger::init();

    let config = config::load_or_default();
    if let Err(e) = config::write_default_config() {
        log::debug!("could not write the default config file: {e}");
    }

    let (tx, rx) = async_channel::bounded(32);

    runtime::start_background_services(tx.clone());
    runtime::load_vectors_in_background(config.embeddings.clone(), tx.clone());

    let app = RelmApp::new("org.wordwheel.wordwheel");

    app.run::<AppModel>((config, tx, rx));
}
