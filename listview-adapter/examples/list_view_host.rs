// Example: a host that pools label instances and measures them while binding.
use listview::{Align, LayoutKind, LayoutSettings, ListOptions, Rect};
use listview_adapter::{
    BindContext, Easing, InstanceHost, ItemHost, ListView, ListViewOptions, TemplateId, Templates,
};

const PLAIN: TemplateId = TemplateId(0);
const HEADER: TemplateId = TemplateId(1);

struct Message {
    id: u64,
    text: String,
    header: bool,
}

#[derive(Debug)]
struct Label {
    template: TemplateId,
    visible: bool,
    text: String,
}

#[derive(Default)]
struct Host {
    created: usize,
    binds: usize,
}

impl InstanceHost for Host {
    type Instance = Label;

    fn create(&mut self, template: TemplateId) -> Label {
        self.created += 1;
        Label {
            template,
            visible: false,
            text: String::new(),
        }
    }

    fn set_active(&mut self, label: &mut Label, active: bool) {
        label.visible = active;
    }

    fn destroy(&mut self, _label: Label) {}
}

impl ItemHost<Message> for Host {
    fn bind(&mut self, label: &mut Label, item: &Message, ctx: &mut BindContext) {
        self.binds += 1;
        label.text.clone_from(&item.text);
        // One line per 40 characters, 18 units per line.
        let lines = item.text.len().div_ceil(40).max(1);
        ctx.report_size(lines as f32 * 18.0);
    }
}

fn main() {
    let messages: Vec<Message> = (0..10_000u64)
        .map(|id| Message {
            id,
            text: "lorem ipsum ".repeat(1 + (id % 7) as usize),
            header: id % 50 == 0,
        })
        .collect();

    let settings = LayoutSettings::new(LayoutKind::Variable, 18).with_spacing(2);
    let list = ListOptions::new(settings).with_initial_rect(Some(Rect::new(200, 320)));
    let options = ListViewOptions::new(list, |m: &Message, _| m.id);
    let templates = Templates::new()
        .with_default(PLAIN, 18.0)
        .with_template(HEADER, 32.0)
        .with_selector(|m: &Message, _| if m.header { HEADER } else { PLAIN });

    let mut host = Host::default();
    let mut view: ListView<Message, u64, Label> =
        ListView::new(messages, options, templates).expect("valid templates");

    view.update(&mut host, 0).expect("update");
    println!(
        "first frame: window={:?} created={} binds={}",
        view.visible_window(),
        host.created,
        host.binds
    );

    let target = view
        .scroll_to_animated(5_000, Align::Center, 0, 240, Easing::SmoothStep)
        .expect("index in range");
    let mut now_ms = 0;
    while view.is_animating() {
        now_ms += 16;
        view.update(&mut host, now_ms).expect("update");
    }
    println!(
        "after animation: target={target} off={} displayed={:?}",
        view.engine().scroll_offset(),
        view.displayed_indices()
    );

    view.for_each_displayed_instance(|item, label| {
        println!(
            "  #{:<5} start={:<6} template={:?} visible={} {:?}",
            item.index, item.start, label.template, label.visible, label.text
        );
    });
    println!("instances created={} binds={}", host.created, host.binds);
}
