use lazy_static::lazy_static;
use std::collections::HashSet;

pub const EVENT_PREFIX: &str = "on";
pub const TRIGGER_METHOD: &str = "__triggerPropsFn";
pub const CONSTRUCTOR_ALIAS: &str = "_constructor";
pub const FN_MARKER_PREFIX: &str = "__fn_";
pub const HANDLER_PREFIX: &str = "func__";
pub const PROPS_FIELD: &str = "props";
pub const STATE_FIELD: &str = "state";
pub const RENDER_METHOD: &str = "render";
pub const CHILDREN_PROP: &str = "children";
pub const SLOT_TAG: &str = "slot";
pub const ANONYMOUS_STATE_PREFIX: &str = "anonymousState_";
pub const LOOP_STATE_PREFIX: &str = "loopState_";

lazy_static! {
    /// Built-in view elements of the host runtime. Tags outside this set may be custom
    /// components when bound to an import.
    pub static ref DEFAULT_COMPONENTS: HashSet<&'static str> = {
        let mut s = HashSet::new();
        // view containers
        s.insert("View");
        s.insert("ScrollView");
        s.insert("Swiper");
        s.insert("SwiperItem");
        s.insert("MovableArea");
        s.insert("MovableView");
        s.insert("CoverView");
        s.insert("CoverImage");
        // basic content
        s.insert("Icon");
        s.insert("Text");
        s.insert("RichText");
        s.insert("Progress");
        // forms
        s.insert("Button");
        s.insert("Checkbox");
        s.insert("CheckboxGroup");
        s.insert("Form");
        s.insert("Input");
        s.insert("Label");
        s.insert("Picker");
        s.insert("PickerView");
        s.insert("PickerViewColumn");
        s.insert("Radio");
        s.insert("RadioGroup");
        s.insert("Slider");
        s.insert("Switch");
        s.insert("Textarea");
        // navigation & media
        s.insert("Navigator");
        s.insert("Audio");
        s.insert("Image");
        s.insert("Video");
        s.insert("Camera");
        s.insert("LivePlayer");
        s.insert("LivePusher");
        s.insert("Map");
        s.insert("Canvas");
        s.insert("OpenData");
        s.insert("WebView");
        s.insert("Block");
        s
    };

    /// Lifecycle hooks whose first parameter carries incoming props.
    pub static ref PROPS_LIFECYCLES: HashSet<&'static str> = {
        let mut s = HashSet::new();
        s.insert("constructor");
        s.insert("componentDidUpdate");
        s.insert("shouldComponentUpdate");
        s.insert("getDerivedStateFromProps");
        s.insert("getSnapshotBeforeUpdate");
        s.insert("componentWillReceiveProps");
        s.insert("componentWillUpdate");
        s
    };
}

pub fn fn_marker(name: &str) -> String {
    format!("{}{}", FN_MARKER_PREFIX, name)
}
