use linkcard::{HttpGateway, LinkEditor, Platform, SaveOutcome, StoredLink};

#[tokio::main]
async fn main() -> linkcard::Result<()> {
    let mut editor = LinkEditor::new();
    editor.load(vec![
        StoredLink::new("GitHub", "https://github.com/octocat"),
        StoredLink::new("YouTube", "https://www.youtube.com/channel/octocat"),
    ])?;

    let index = editor.entries().len();
    editor.add();
    editor.set_platform(index, Platform::FrontendMentor);
    editor.set_url(index, "https://www.frontendmentor.io/profile/octocat");
    editor.reorder(index, Some(0));

    for item in &editor.preview().items {
        println!("{:<16} {:<8} {}", item.label, item.background_color, item.href);
    }
    println!("card viewBox: {}", editor.preview().view_box());

    let Ok(base_url) = std::env::var("LINKCARD_URL") else {
        println!("set LINKCARD_URL and LINKCARD_USER to save");
        return Ok(());
    };
    let user_id = std::env::var("LINKCARD_USER").unwrap_or_default();
    let gateway = HttpGateway::new(base_url, user_id);

    match editor.save(&gateway).await {
        Ok(SaveOutcome::Saved) => println!("Links Updated Successfully"),
        Ok(outcome) => println!("not saved: {outcome:?}"),
        Err(e) => println!("save failed: {e}"),
    }
    Ok(())
}
