pub const RING_DELAY_MS: u32 = 50;
pub const RING_OFFSET: f64 = 10.0;
pub const CLICKABLE_CLASS: &str = "clickable";

#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

pub fn is_clickable(tag_name: &str, has_click_handler: bool, has_marker_class: bool) -> bool {
    tag_name.eq_ignore_ascii_case("a")
        || tag_name.eq_ignore_ascii_case("button")
        || has_click_handler
        || has_marker_class
}

#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub struct PointerState {
    pub dot: Point,
    pub ring: Point,
    pub hovering_clickable: bool,
}

impl PointerState {
    pub fn move_dot(&mut self, point: Point, hovering_clickable: bool) {
        self.dot = point;
        self.hovering_clickable = hovering_clickable;
    }

    pub fn settle_ring(&mut self, point: Point) {
        self.ring = point;
    }

    pub fn dot_transform(&self) -> String {
        format!("translate({:.1}px, {:.1}px)", self.dot.x, self.dot.y)
    }

    pub fn ring_transform(&self) -> String {
        format!(
            "translate({:.1}px, {:.1}px)",
            self.ring.x - RING_OFFSET,
            self.ring.y - RING_OFFSET
        )
    }
}

#[derive(Clone, Copy, PartialEq, Debug)]
pub struct TrailTicket {
    generation: u64,
    point: Point,
}

impl TrailTicket {
    pub fn point(&self) -> Point {
        self.point
    }
}

#[derive(Default, Debug)]
pub struct RingTrail {
    latest: u64,
}

impl RingTrail {
    pub fn request(&mut self, point: Point) -> TrailTicket {
        self.latest += 1;
        TrailTicket {
            generation: self.latest,
            point,
        }
    }

    pub fn is_current(&self, ticket: &TrailTicket) -> bool {
        ticket.generation == self.latest
    }
}
