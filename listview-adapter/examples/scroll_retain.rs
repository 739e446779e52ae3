// Example: keeping the viewport steady while a timeline receives new items on top.
use listview::{Align, LayoutKind, LayoutSettings, ListOptions, Rect};
use listview_adapter::{
    BindContext, InstanceHost, ItemHost, ListView, ListViewOptions, ScrollData, TemplateId,
    Templates,
};

struct Noop;

impl InstanceHost for Noop {
    type Instance = ();

    fn create(&mut self, _template: TemplateId) {}

    fn set_active(&mut self, _instance: &mut (), _active: bool) {}

    fn destroy(&mut self, _instance: ()) {}
}

impl ItemHost<u64> for Noop {
    fn bind(&mut self, _instance: &mut (), _item: &u64, _ctx: &mut BindContext) {}
}

fn main() {
    let settings = LayoutSettings::new(LayoutKind::Variable, 24);
    let list = ListOptions::new(settings).with_initial_rect(Some(Rect::new(240, 300)));
    let options = ListViewOptions::new(list, |post: &u64, _| *post);
    let mut view: ListView<u64, u64, ()> =
        ListView::new((1000..2000).collect(), options, Templates::single(TemplateId(0), 24.0))
            .expect("valid templates");

    view.scroll_to(300, Align::Start).expect("index in range");
    view.update(&mut Noop, 0).expect("update");
    let anchor = ScrollData::capture(view.engine());
    println!(
        "before: off={} first={:?} anchor={:?}",
        view.engine().scroll_offset(),
        view.engine().first_visible_index(true),
        anchor.entries.first()
    );

    // Ten new posts arrive on top; the same post stays at the top of the viewport.
    view.data_mut()
        .insert_many(0, 2000..2010)
        .expect("insert at the front");
    view.update(&mut Noop, 16).expect("update");
    let first = view.engine().first_visible_index(true);
    println!(
        "after: off={} first={first:?} key={:?}",
        view.engine().scroll_offset(),
        first.and_then(|i| view.engine().key_for(i))
    );
}
