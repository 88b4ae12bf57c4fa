use crate::background::BackgroundCanvas;
use crate::contact::{self, ContactForm, Field};
use crate::content::{Project, Section, SocialLink, CONTACT_HEADING, CONTACT_INTRO, PROFILE, PROJECTS, SKILLS};
use crate::cursor::{is_clickable, Point, PointerState, RingTrail, CLICKABLE_CLASS, RING_DELAY_MS};
use crate::logging::{log_event, set_threshold, LogLevel};
use crate::notice::{Notice, NoticeKind, Notices};
use crate::relay::HttpRelay;
use gloo::events::EventListener;
use gloo::timers::callback::Timeout;
use serde_json::json;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{window, Element, HtmlElement, HtmlInputElement, HtmlTextAreaElement, MouseEvent};
use yew::prelude::*;

type Notify = Callback<(NoticeKind, AttrValue)>;

pub enum PointerAction {
    Moved { point: Point, clickable: bool },
    Settled(Point),
}

impl Reducible for PointerState {
    type Action = PointerAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let mut next = *self;
        match action {
            PointerAction::Moved { point, clickable } => next.move_dot(point, clickable),
            PointerAction::Settled(point) => next.settle_ring(point),
        }
        Rc::new(next)
    }
}

pub enum NoticeAction {
    Push(NoticeKind, AttrValue),
    Dismiss(u64),
}

impl Reducible for Notices {
    type Action = NoticeAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let mut next = (*self).clone();
        match action {
            NoticeAction::Push(kind, message) => {
                next.push(kind, message.to_string());
            }
            NoticeAction::Dismiss(id) => {
                if !next.dismiss(id) {
                    return self;
                }
            }
        }
        Rc::new(next)
    }
}

fn element_is_clickable(element: &Element) -> bool {
    let has_click_handler = element
        .dyn_ref::<HtmlElement>()
        .is_some_and(|html| html.onclick().is_some());

    is_clickable(
        &element.tag_name(),
        has_click_handler,
        element.class_list().contains(CLICKABLE_CLASS),
    )
}

#[function_component(CustomCursor)]
fn custom_cursor() -> Html {
    let pointer = use_reducer(PointerState::default);

    {
        let dispatcher = pointer.dispatcher();
        use_effect_with((), move |_| {
            let trail = Rc::new(RefCell::new(RingTrail::default()));
            let pending: Rc<RefCell<Option<Timeout>>> = Rc::new(RefCell::new(None));

            let listener = window().map(|win| {
                let pending = pending.clone();
                EventListener::new(&win, "mousemove", move |event| {
                    let Some(event) = event.dyn_ref::<MouseEvent>() else {
                        return;
                    };
                    let point = Point::new(f64::from(event.client_x()), f64::from(event.client_y()));
                    let clickable = event
                        .target()
                        .and_then(|target| target.dyn_into::<Element>().ok())
                        .is_some_and(|element| element_is_clickable(&element));

                    dispatcher.dispatch(PointerAction::Moved { point, clickable });

                    let ticket = trail.borrow_mut().request(point);
                    let settle = {
                        let dispatcher = dispatcher.clone();
                        let trail = trail.clone();
                        move || {
                            if trail.borrow().is_current(&ticket) {
                                dispatcher.dispatch(PointerAction::Settled(ticket.point()));
                            }
                        }
                    };
                    // Replacing the handle cancels the superseded update.
                    *pending.borrow_mut() = Some(Timeout::new(RING_DELAY_MS, settle));
                })
            });

            move || {
                drop(listener);
                pending.borrow_mut().take();
            }
        });
    }

    html! {
        <>
            <div class="cursor-dot" style={format!("transform: {};", pointer.dot_transform())} />
            <div
                class={classes!("cursor-ring", pointer.hovering_clickable.then_some("is-pointer"))}
                style={format!("transform: {};", pointer.ring_transform())}
            />
        </>
    }
}

#[derive(Properties, PartialEq)]
struct NoticeItemProps {
    notice: Notice,
    on_dismiss: Callback<u64>,
}

#[function_component(NoticeItem)]
fn notice_item(props: &NoticeItemProps) -> Html {
    {
        let on_dismiss = props.on_dismiss.clone();
        let lifetime = props.notice.kind.lifetime_ms();
        use_effect_with(props.notice.id, move |id| {
            let id = *id;
            let timeout = Timeout::new(lifetime, move || on_dismiss.emit(id));
            move || drop(timeout)
        });
    }

    let role = match props.notice.kind {
        NoticeKind::Success => "status",
        NoticeKind::Error => "alert",
    };

    html! {
        <div class={classes!("notice", props.notice.kind.class())} role={role}>
            {props.notice.message.clone()}
        </div>
    }
}

#[derive(Properties, PartialEq)]
struct ToasterProps {
    notices: Vec<Notice>,
    on_dismiss: Callback<u64>,
}

#[function_component(Toaster)]
fn toaster(props: &ToasterProps) -> Html {
    html! {
        <div class="toaster" aria-live="polite">
            { for props.notices.iter().map(|notice| html! {
                <NoticeItem key={notice.id} notice={notice.clone()} on_dismiss={props.on_dismiss.clone()} />
            }) }
        </div>
    }
}

#[derive(Properties, PartialEq)]
struct ExternalLinkProps {
    href: AttrValue,
    #[prop_or_default]
    class: Classes,
    #[prop_or(true)]
    new_tab: bool,
    #[prop_or_default]
    label: Option<AttrValue>,
    children: Children,
}

#[function_component(ExternalLink)]
fn external_link(props: &ExternalLinkProps) -> Html {
    let (target, rel) = if props.new_tab {
        (Some("_blank"), Some("noopener noreferrer"))
    } else {
        (None, None)
    };

    html! {
        <a
            class={props.class.clone()}
            href={props.href.clone()}
            target={target}
            rel={rel}
            aria-label={props.label.clone()}
        >
            {props.children.clone()}
            if props.new_tab {
                <span class="sr-only">{" (opens in a new tab)"}</span>
            }
        </a>
    }
}

#[derive(Properties, PartialEq)]
struct NavBarProps {
    active: Section,
    on_select: Callback<Section>,
}

#[function_component(NavBar)]
fn nav_bar(props: &NavBarProps) -> Html {
    html! {
        <nav class="site-nav" aria-label="Sections">
            { for Section::ALL.iter().map(|&section| {
                let is_active = section == props.active;
                let onclick = {
                    let on_select = props.on_select.clone();
                    Callback::from(move |_: MouseEvent| on_select.emit(section))
                };
                html! {
                    <button
                        type="button"
                        class={classes!("nav-item", is_active.then_some("is-active"))}
                        aria-current={is_active.then_some("page")}
                        onclick={onclick}
                    >
                        {section.label()}
                    </button>
                }
            }) }
        </nav>
    }
}

#[function_component(AboutSection)]
fn about_section() -> Html {
    html! {
        <div class="about">
            <h1 class="about-name">{PROFILE.name}</h1>
            <h2 class="about-title">{PROFILE.title}</h2>
            <p class="about-bio">{PROFILE.bio}</p>
            <ul class="social-links">
                { for PROFILE.links.iter().map(|link: &SocialLink| html! {
                    <li key={link.label}>
                        <ExternalLink
                            class={classes!("social-link")}
                            href={link.href}
                            new_tab={link.opens_new_tab()}
                            label={Some(AttrValue::from(link.label))}
                        >
                            <span aria-hidden="true">{link.glyph}</span>
                        </ExternalLink>
                    </li>
                }) }
            </ul>
        </div>
    }
}

#[function_component(ProjectsSection)]
fn projects_section() -> Html {
    html! {
        <div class="project-grid">
            { for PROJECTS.iter().map(|project: &Project| html! {
                <ExternalLink key={project.name} class={classes!("project-card")} href={project.link}>
                    <h3>{project.name}</h3>
                    <p class="muted">{project.description}</p>
                </ExternalLink>
            }) }
        </div>
    }
}

#[function_component(SkillsSection)]
fn skills_section() -> Html {
    html! {
        <ul class="skill-grid">
            { for SKILLS.iter().map(|skill| html! {
                <li key={*skill} class="skill-card">{*skill}</li>
            }) }
        </ul>
    }
}

#[derive(Properties, PartialEq)]
struct FormFieldProps {
    field: Field,
    value: AttrValue,
    error: Option<&'static str>,
    on_input: Callback<(Field, String)>,
}

#[function_component(FormField)]
fn form_field(props: &FormFieldProps) -> Html {
    let field = props.field;
    let error_id = format!("{}-error", field.as_str());
    let class = classes!("form-input", props.error.is_some().then_some("has-error"));
    let described_by = props.error.is_some().then(|| error_id.clone());

    let control = if field == Field::Message {
        let on_input = props.on_input.clone();
        let oninput = Callback::from(move |event: InputEvent| {
            let value = event.target_unchecked_into::<HtmlTextAreaElement>().value();
            on_input.emit((field, value));
        });
        html! {
            <textarea
                id={field.as_str()}
                name={field.as_str()}
                rows="5"
                class={class}
                placeholder={field.placeholder()}
                value={props.value.clone()}
                aria-invalid={props.error.is_some().to_string()}
                aria-describedby={described_by}
                oninput={oninput}
            />
        }
    } else {
        let on_input = props.on_input.clone();
        let oninput = Callback::from(move |event: InputEvent| {
            let value = event.target_unchecked_into::<HtmlInputElement>().value();
            on_input.emit((field, value));
        });
        let input_type = if field == Field::Email { "email" } else { "text" };
        html! {
            <input
                type={input_type}
                id={field.as_str()}
                name={field.as_str()}
                class={class}
                placeholder={field.placeholder()}
                value={props.value.clone()}
                aria-invalid={props.error.is_some().to_string()}
                aria-describedby={described_by}
                oninput={oninput}
            />
        }
    };

    html! {
        <div class="form-field">
            <label for={field.as_str()} class="form-label">{field.label()}</label>
            {control}
            if let Some(error) = props.error {
                <p id={error_id} class="form-error">{error}</p>
            }
        </div>
    }
}

#[derive(Properties, PartialEq)]
struct ContactFormViewProps {
    on_notify: Notify,
}

#[function_component(ContactFormView)]
fn contact_form_view(props: &ContactFormViewProps) -> Html {
    let form = use_mut_ref(ContactForm::default);
    let refresh = use_force_update();
    let relay = use_memo((), |_| HttpRelay::from_build_env());

    let on_input = {
        let form = form.clone();
        let refresh = refresh.clone();
        Callback::from(move |(field, value): (Field, String)| {
            form.borrow_mut().update_field(field, value);
            refresh.force_update();
        })
    };

    let onsubmit = {
        let form = form.clone();
        let refresh = refresh.clone();
        let on_notify = props.on_notify.clone();
        Callback::from(move |event: SubmitEvent| {
            event.prevent_default();

            let form = form.clone();
            let refresh = refresh.clone();
            let relay = relay.clone();
            let on_notify = on_notify.clone();
            spawn_local(async move {
                let notice = match contact::submit(&form, relay.as_ref(), || refresh.force_update()).await {
                    Ok(outcome) => Some(outcome.notice()),
                    Err(rejected) => rejected.notice(),
                };

                if let Some((kind, message)) = notice {
                    on_notify.emit((kind, AttrValue::from(message)));
                }
            });
        })
    };

    let (fields, submitting) = {
        let state = form.borrow();
        let fields: Html = Field::ALL
            .iter()
            .map(|&field| {
                html! {
                    <FormField
                        key={field.as_str()}
                        field={field}
                        value={AttrValue::from(state.data().get(field).to_string())}
                        error={state.error(field)}
                        on_input={on_input.clone()}
                    />
                }
            })
            .collect();
        let submitting = state.is_submitting();
        (fields, submitting)
    };

    html! {
        <form class="contact-form" onsubmit={onsubmit} novalidate={true}>
            {fields}
            <button
                type="submit"
                class={classes!("submit-button", submitting.then_some("is-busy"))}
                disabled={submitting}
            >
                if submitting {
                    <span class="spinner" aria-hidden="true" />
                    {"Sending..."}
                } else {
                    {"Send Message"}
                }
            </button>
        </form>
    }
}

#[derive(Properties, PartialEq)]
struct ContactSectionProps {
    on_notify: Notify,
}

#[function_component(ContactSection)]
fn contact_section(props: &ContactSectionProps) -> Html {
    html! {
        <div class="contact">
            <h2 class="contact-heading">{CONTACT_HEADING}</h2>
            <p class="muted contact-intro">{CONTACT_INTRO}</p>
            <ContactFormView on_notify={props.on_notify.clone()} />
        </div>
    }
}

#[function_component(App)]
fn app() -> Html {
    let section = use_state(Section::default);
    let notices = use_reducer(Notices::default);

    let on_select = {
        let section = section.clone();
        Callback::from(move |next: Section| section.set(next))
    };

    let on_notify: Notify = {
        let notices = notices.dispatcher();
        Callback::from(move |(kind, message): (NoticeKind, AttrValue)| {
            notices.dispatch(NoticeAction::Push(kind, message));
        })
    };

    let on_dismiss = {
        let notices = notices.dispatcher();
        Callback::from(move |id: u64| notices.dispatch(NoticeAction::Dismiss(id)))
    };

    let current = *section;
    let view = match current {
        Section::About => html! { <AboutSection /> },
        Section::Projects => html! { <ProjectsSection /> },
        Section::Skills => html! { <SkillsSection /> },
        Section::Contact => html! { <ContactSection on_notify={on_notify} /> },
    };

    html! {
        <div class="app">
            <CustomCursor />
            <BackgroundCanvas />
            <Toaster notices={notices.items().to_vec()} on_dismiss={on_dismiss} />
            <div class="page-shell">
                <NavBar active={current} on_select={on_select} />
                <main id="content" class="section-stage">
                    <section
                        key={current.as_str()}
                        class={classes!("section-view", current.enter_class())}
                        aria-label={current.label()}
                    >
                        {view}
                    </section>
                </main>
            </div>
        </div>
    }
}

pub fn run() {
    if let Some(level) = option_env!("PORTFOLIO_LOG_LEVEL").and_then(LogLevel::parse) {
        set_threshold(level);
    }

    yew::Renderer::<App>::with_root(
        window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id("app"))
            .expect("missing #app mount point"),
    )
    .render();

    log_event(LogLevel::Debug, "app_mounted", json!({}));
}
