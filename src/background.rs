use crate::animation::{AnimationLoop, BrowserFrames};
use crate::logging::{log_event, LogLevel};
use crate::scene::{
    particle_positions, SceneState, TorusGeometry, PARTICLE_COUNT, PARTICLE_SIZE, PARTICLE_SPREAD,
    TORUS_RADIAL_SEGMENTS, TORUS_RADIUS, TORUS_TUBE, TORUS_TUBULAR_SEGMENTS,
};
use glam::Mat4;
use gloo::events::EventListener;
use serde_json::json;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{
    window, Element, HtmlCanvasElement, WebGlBuffer, WebGlProgram, WebGlRenderingContext as GL,
    WebGlShader, WebGlUniformLocation,
};
use yew::prelude::*;

const MESH_VERTEX_SHADER: &str = r#"
attribute vec3 a_position;
uniform mat4 u_model_view;
uniform mat4 u_projection;
void main() {
    gl_Position = u_projection * u_model_view * vec4(a_position, 1.0);
}
"#;

const POINT_VERTEX_SHADER: &str = r#"
attribute vec3 a_position;
uniform mat4 u_model_view;
uniform mat4 u_projection;
uniform float u_size;
uniform float u_scale;
void main() {
    vec4 eye = u_model_view * vec4(a_position, 1.0);
    gl_PointSize = u_size * (u_scale / -eye.z);
    gl_Position = u_projection * eye;
}
"#;

const SOLID_FRAGMENT_SHADER: &str = r#"
precision mediump float;
uniform vec3 u_color;
void main() {
    gl_FragColor = vec4(u_color, 1.0);
}
"#;

const TORUS_COLOR: [f32; 3] = [0.0, 0.0, 0.0];
const PARTICLE_COLOR: [f32; 3] = [1.0, 1.0, 1.0];

#[derive(Debug)]
pub enum BackgroundError {
    NoDocument,
    ContextUnavailable,
    Shader(String),
    Resource(&'static str),
    Dom(String),
}

impl fmt::Display for BackgroundError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoDocument => f.write_str("no document to attach the canvas to"),
            Self::ContextUnavailable => f.write_str("WebGL context unavailable"),
            Self::Shader(log) => write!(f, "shader failed: {log}"),
            Self::Resource(what) => write!(f, "could not create {what}"),
            Self::Dom(reason) => write!(f, "DOM call failed: {reason}"),
        }
    }
}

impl std::error::Error for BackgroundError {}

impl From<JsValue> for BackgroundError {
    fn from(value: JsValue) -> Self {
        Self::Dom(value.as_string().unwrap_or_else(|| format!("{value:?}")))
    }
}

fn viewport_size() -> (f64, f64) {
    let Some(win) = window() else {
        return (1280.0, 720.0);
    };

    let width = win
        .inner_width()
        .ok()
        .and_then(|value| value.as_f64())
        .unwrap_or(1280.0);
    let height = win
        .inner_height()
        .ok()
        .and_then(|value| value.as_f64())
        .unwrap_or(720.0);

    (width, height)
}

fn compile_shader(gl: &GL, kind: u32, source: &str) -> Result<WebGlShader, BackgroundError> {
    let shader = gl
        .create_shader(kind)
        .ok_or(BackgroundError::Resource("shader"))?;
    gl.shader_source(&shader, source);
    gl.compile_shader(&shader);

    if gl
        .get_shader_parameter(&shader, GL::COMPILE_STATUS)
        .as_bool()
        .unwrap_or(false)
    {
        Ok(shader)
    } else {
        Err(BackgroundError::Shader(
            gl.get_shader_info_log(&shader).unwrap_or_default(),
        ))
    }
}

fn link_program(gl: &GL, vertex: &str, fragment: &str) -> Result<WebGlProgram, BackgroundError> {
    let vertex = compile_shader(gl, GL::VERTEX_SHADER, vertex)?;
    let fragment = compile_shader(gl, GL::FRAGMENT_SHADER, fragment)?;
    let program = gl
        .create_program()
        .ok_or(BackgroundError::Resource("program"))?;
    gl.attach_shader(&program, &vertex);
    gl.attach_shader(&program, &fragment);
    gl.link_program(&program);

    if gl
        .get_program_parameter(&program, GL::LINK_STATUS)
        .as_bool()
        .unwrap_or(false)
    {
        Ok(program)
    } else {
        Err(BackgroundError::Shader(
            gl.get_program_info_log(&program).unwrap_or_default(),
        ))
    }
}

fn upload_f32(gl: &GL, data: &[f32]) -> Result<WebGlBuffer, BackgroundError> {
    let buffer = gl
        .create_buffer()
        .ok_or(BackgroundError::Resource("vertex buffer"))?;
    gl.bind_buffer(GL::ARRAY_BUFFER, Some(&buffer));
    let view = js_sys::Float32Array::from(data);
    gl.buffer_data_with_array_buffer_view(GL::ARRAY_BUFFER, &view, GL::STATIC_DRAW);
    Ok(buffer)
}

fn upload_u16(gl: &GL, data: &[u16]) -> Result<WebGlBuffer, BackgroundError> {
    let buffer = gl
        .create_buffer()
        .ok_or(BackgroundError::Resource("index buffer"))?;
    gl.bind_buffer(GL::ELEMENT_ARRAY_BUFFER, Some(&buffer));
    let view = js_sys::Uint16Array::from(data);
    gl.buffer_data_with_array_buffer_view(GL::ELEMENT_ARRAY_BUFFER, &view, GL::STATIC_DRAW);
    Ok(buffer)
}

struct Uniforms {
    model_view: Option<WebGlUniformLocation>,
    projection: Option<WebGlUniformLocation>,
    color: Option<WebGlUniformLocation>,
    size: Option<WebGlUniformLocation>,
    scale: Option<WebGlUniformLocation>,
}

struct Shape {
    program: WebGlProgram,
    position: u32,
    uniforms: Uniforms,
    vertices: WebGlBuffer,
}

impl Shape {
    fn new(gl: &GL, vertex_shader: &str, positions: &[f32]) -> Result<Self, BackgroundError> {
        let program = link_program(gl, vertex_shader, SOLID_FRAGMENT_SHADER)?;
        let position = u32::try_from(gl.get_attrib_location(&program, "a_position"))
            .map_err(|_| BackgroundError::Resource("position attribute"))?;
        let uniforms = Uniforms {
            model_view: gl.get_uniform_location(&program, "u_model_view"),
            projection: gl.get_uniform_location(&program, "u_projection"),
            color: gl.get_uniform_location(&program, "u_color"),
            size: gl.get_uniform_location(&program, "u_size"),
            scale: gl.get_uniform_location(&program, "u_scale"),
        };
        let vertices = upload_f32(gl, positions)?;

        Ok(Self {
            program,
            position,
            uniforms,
            vertices,
        })
    }

    fn bind(&self, gl: &GL, model_view: Mat4, projection: Mat4, color: [f32; 3]) {
        gl.use_program(Some(&self.program));
        gl.bind_buffer(GL::ARRAY_BUFFER, Some(&self.vertices));
        gl.vertex_attrib_pointer_with_i32(self.position, 3, GL::FLOAT, false, 0, 0);
        gl.enable_vertex_attrib_array(self.position);
        gl.uniform_matrix4fv_with_f32_array(
            self.uniforms.model_view.as_ref(),
            false,
            &model_view.to_cols_array(),
        );
        gl.uniform_matrix4fv_with_f32_array(
            self.uniforms.projection.as_ref(),
            false,
            &projection.to_cols_array(),
        );
        gl.uniform3fv_with_f32_array(self.uniforms.color.as_ref(), &color);
    }
}

struct Renderer {
    gl: GL,
    torus: Shape,
    torus_indices: WebGlBuffer,
    torus_index_count: i32,
    particles: Shape,
    particle_count: i32,
}

impl Renderer {
    fn new(gl: GL) -> Result<Self, BackgroundError> {
        let geometry = TorusGeometry::new(
            TORUS_RADIUS,
            TORUS_TUBE,
            TORUS_RADIAL_SEGMENTS,
            TORUS_TUBULAR_SEGMENTS,
        );
        let torus = Shape::new(&gl, MESH_VERTEX_SHADER, &geometry.positions)?;
        let torus_indices = upload_u16(&gl, &geometry.indices)?;

        let positions = particle_positions(PARTICLE_COUNT, PARTICLE_SPREAD, js_sys::Math::random);
        let particles = Shape::new(&gl, POINT_VERTEX_SHADER, &positions)?;

        gl.enable(GL::DEPTH_TEST);
        gl.clear_color(0.0, 0.0, 0.0, 1.0);

        Ok(Self {
            torus_index_count: i32::try_from(geometry.indices.len()).unwrap_or(i32::MAX),
            particle_count: i32::try_from(PARTICLE_COUNT).unwrap_or(i32::MAX),
            gl,
            torus,
            torus_indices,
            particles,
        })
    }

    fn resize(&self, width: f64, height: f64) {
        self.gl.viewport(0, 0, width as i32, height as i32);
    }

    fn draw(&self, scene: &SceneState) {
        let gl = &self.gl;
        let view = scene.camera.view();
        let projection = scene.camera.projection();

        gl.clear(GL::COLOR_BUFFER_BIT | GL::DEPTH_BUFFER_BIT);

        self.torus
            .bind(gl, view * scene.torus_model(), projection, TORUS_COLOR);
        gl.bind_buffer(GL::ELEMENT_ARRAY_BUFFER, Some(&self.torus_indices));
        gl.draw_elements_with_i32(GL::TRIANGLES, self.torus_index_count, GL::UNSIGNED_SHORT, 0);

        self.particles
            .bind(gl, view * scene.particle_model(), projection, PARTICLE_COLOR);
        gl.uniform1f(self.particles.uniforms.size.as_ref(), PARTICLE_SIZE);
        gl.uniform1f(self.particles.uniforms.scale.as_ref(), scene.point_scale());
        gl.draw_arrays(GL::POINTS, 0, self.particle_count);
    }
}

struct Background {
    canvas: HtmlCanvasElement,
    _resize: EventListener,
    animation: AnimationLoop<BrowserFrames>,
}

impl Background {
    fn mount(host: &Element) -> Result<Self, BackgroundError> {
        let win = window().ok_or(BackgroundError::NoDocument)?;
        let document = win.document().ok_or(BackgroundError::NoDocument)?;
        let canvas: HtmlCanvasElement = document
            .create_element("canvas")?
            .dyn_into()
            .map_err(|_| BackgroundError::Resource("canvas"))?;
        let gl: GL = canvas
            .get_context("webgl")?
            .ok_or(BackgroundError::ContextUnavailable)?
            .dyn_into()
            .map_err(|_| BackgroundError::ContextUnavailable)?;

        let (width, height) = viewport_size();
        set_canvas_size(&canvas, width, height);
        let renderer = Rc::new(Renderer::new(gl)?);
        renderer.resize(width, height);
        let scene = Rc::new(RefCell::new(SceneState::new(width, height)));

        host.append_child(&canvas)?;

        let resize = {
            let canvas = canvas.clone();
            let renderer = renderer.clone();
            let scene = scene.clone();
            EventListener::new(&win, "resize", move |_event| {
                let (width, height) = viewport_size();
                set_canvas_size(&canvas, width, height);
                renderer.resize(width, height);
                scene.borrow_mut().resize(width, height);
            })
        };

        let animation = AnimationLoop::start(BrowserFrames, move || {
            let mut scene = scene.borrow_mut();
            scene.advance();
            renderer.draw(&scene);
        });

        log_event(
            LogLevel::Debug,
            "background_mounted",
            json!({ "width": width, "height": height, "particles": PARTICLE_COUNT }),
        );

        Ok(Self {
            canvas,
            _resize: resize,
            animation,
        })
    }
}

impl Drop for Background {
    fn drop(&mut self) {
        self.animation.stop();
        self.canvas.remove();
        log_event(
            LogLevel::Debug,
            "background_unmounted",
            json!({ "frames": self.animation.frames() }),
        );
    }
}

fn set_canvas_size(canvas: &HtmlCanvasElement, width: f64, height: f64) {
    canvas.set_width(width as u32);
    canvas.set_height(height as u32);
}

#[function_component(BackgroundCanvas)]
pub fn background_canvas() -> Html {
    let host = use_node_ref();

    {
        let host = host.clone();
        use_effect_with((), move |_| {
            let mounted = host
                .cast::<Element>()
                .ok_or(BackgroundError::NoDocument)
                .and_then(|element| Background::mount(&element));

            let background = match mounted {
                Ok(background) => Some(background),
                Err(error) => {
                    log_event(
                        LogLevel::Warn,
                        "background_unavailable",
                        json!({ "error": error.to_string() }),
                    );
                    None
                }
            };

            move || drop(background)
        });
    }

    html! {
        <div ref={host} class="background" aria-hidden="true" />
    }
}
