//! The showcase flow.
//!
//! [`Portfolio`] owns the loaded scene and everything that happens in it:
//! the walking character, hover picking of the project objects and the
//! project modal. The state changes are plain methods so they can be driven
//! without a window; the [`GraphicsFlow`] impl at the bottom wires them to
//! winit, the GPU context and the DOM.

use cgmath::Vector3;
use instant::Duration;
use winit::{
    event::{ElementState, MouseButton, WindowEvent},
    window::CursorIcon,
};

use crate::{
    character::{Character, Direction},
    config::{CONFIG_FILE, FolioConfig},
    context::{Context, InitContext},
    data_structures::scene_graph::SceneGraph,
    flow::{EventSender, GraphicsFlow, Out},
    input::Command,
    modal::{ModalState, ModalView},
    raycast::{Ray, Raycaster},
    render::Render,
    resources::{GpuScene, LoadedScene, load_scene_gltf},
    scene::SceneSets,
};

/// Events sent from outside the window: the on-screen d-pad, the modal's
/// exit button and key presses anywhere on the page.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PortfolioEvent {
    Dpad(Direction),
    CloseModal,
    Key(Command),
}

pub struct Portfolio {
    pub config: FolioConfig,
    pub graph: SceneGraph,
    pub gpu: GpuScene,
    pub sets: SceneSets,
    pub character: Option<Character>,
    pub modal: ModalState,
    /// Interactive node under the pointer.
    pub hovered: Option<String>,
    raycaster: Raycaster,
    view: Box<dyn ModalView>,
    pointer_cursor: bool,
    #[cfg(target_arch = "wasm32")]
    _dom: Option<crate::dom::DomBindings>,
}

impl std::fmt::Debug for Portfolio {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Portfolio")
            .field("nodes", &self.graph.len())
            .field("sets", &self.sets)
            .field("character", &self.character)
            .field("modal", &self.modal)
            .field("hovered", &self.hovered)
            .finish()
    }
}

impl Portfolio {
    /// Partitions `graph` and picks up the character if the scene has one.
    pub fn new(
        config: FolioConfig,
        mut graph: SceneGraph,
        gpu: GpuScene,
        view: Box<dyn ModalView>,
    ) -> Self {
        let sets = SceneSets::partition(&mut graph, &config);
        let character = sets
            .character
            .and_then(|node| Character::from_graph(&graph, node, config.character.clone()));
        if character.is_none() {
            log::warn!(
                "No node named {:?} in the scene, movement is disabled.",
                config.character.node_name
            );
        }
        Self {
            config,
            graph,
            gpu,
            sets,
            character,
            modal: ModalState::default(),
            hovered: None,
            raycaster: Raycaster::default(),
            view,
            pointer_cursor: false,
            #[cfg(target_arch = "wasm32")]
            _dom: None,
        }
    }

    /// Loads the configuration and the scene. A scene that fails to load is
    /// logged and replaced by an empty one.
    #[cfg_attr(not(target_arch = "wasm32"), allow(unused_variables))]
    pub async fn load(init: InitContext, sender: EventSender<(), PortfolioEvent>) -> Self {
        let config = FolioConfig::load(CONFIG_FILE).await;
        let scene = match load_scene_gltf(
            &config.scene_file,
            &init.device,
            &init.queue,
            &init.material_layout,
        )
        .await
        {
            Ok(scene) => scene,
            Err(e) => {
                log::error!("Could not load the scene {}: {:#}", config.scene_file, e);
                LoadedScene {
                    graph: SceneGraph::new(),
                    gpu: GpuScene::default(),
                }
            }
        };

        #[cfg(not(target_arch = "wasm32"))]
        {
            Self::new(
                config,
                scene.graph,
                scene.gpu,
                Box::new(crate::modal::LogModal),
            )
        }

        #[cfg(target_arch = "wasm32")]
        {
            let view: Box<dyn ModalView> = match crate::dom::DomModal::bind() {
                Some(modal) => Box::new(modal),
                None => Box::new(crate::modal::LogModal),
            };
            let mut portfolio = Self::new(config, scene.graph, scene.gpu, view);
            portfolio._dom = crate::dom::bind_controls(sender);
            portfolio
        }
    }

    pub fn handle_event(&mut self, event: PortfolioEvent) -> bool {
        match event {
            PortfolioEvent::Dpad(direction) => self.try_move(direction),
            PortfolioEvent::CloseModal => self.handle_command(Command::CloseModal),
            PortfolioEvent::Key(command) => self.handle_command(command),
        }
    }

    pub fn handle_command(&mut self, command: Command) -> bool {
        match command {
            Command::Move(direction) => self.try_move(direction),
            Command::CloseModal => {
                self.close_modal();
                true
            }
        }
    }

    /// Starts a step in `direction` unless the character is busy, missing or
    /// would walk into collision geometry.
    pub fn try_move(&mut self, direction: Direction) -> bool {
        let Some(character) = self.character.as_mut() else {
            return false;
        };
        let Some(step) = character.plan(direction) else {
            return false;
        };
        if !character.can_move_to(step.target, &self.graph, &self.sets.collision, &self.raycaster) {
            log::debug!("Cannot move {:?}, the way is blocked.", direction);
            return false;
        }
        character.begin_move(step);
        true
    }

    pub fn close_modal(&mut self) {
        self.modal.hide(self.view.as_mut());
    }

    /// Advances the character by `dt` seconds and writes its transform into
    /// the graph. Returns `true` if anything moved.
    pub fn update(&mut self, dt: f32) -> bool {
        let Some(character) = self.character.as_mut() else {
            return false;
        };
        if !character.advance(dt) {
            return false;
        }
        character.apply(&mut self.graph);
        true
    }

    pub fn character_position(&self) -> Option<Vector3<f32>> {
        self.character.as_ref().map(|character| character.position)
    }

    /// Picks the interactive object under `ray`. The nearest hit decides.
    pub fn hover(&mut self, ray: Option<&Ray>) -> Option<&str> {
        let hit = ray.and_then(|ray| {
            self.raycaster
                .first_hit(&self.graph, &self.sets.interactive, ray)
        });
        self.hovered = hit.and_then(|hit| {
            self.sets
                .interactive_owner(&self.graph, hit.node)
                .map(str::to_string)
        });
        self.hovered.as_deref()
    }

    /// Opens the modal for the hovered project, if any.
    pub fn click(&mut self) -> bool {
        match self.hovered.as_deref() {
            Some(id) => self.modal.show(id, &self.config.projects, self.view.as_mut()),
            None => false,
        }
    }
}

impl GraphicsFlow<(), PortfolioEvent> for Portfolio {
    fn on_init(&mut self, ctx: &mut Context, _: &mut ()) -> Out {
        ctx.configure(&self.config);
        if let Some(position) = self.character_position() {
            ctx.camera.follow.follow(&mut ctx.camera.camera, position);
        }
        self.gpu.write_to_buffers(&ctx.queue, &self.graph);
        Out::Empty
    }

    fn on_update(&mut self, ctx: &Context, _: &mut (), dt: Duration) -> Out {
        if self.update(dt.as_secs_f32()) {
            self.gpu.write_to_buffers(&ctx.queue, &self.graph);
        }

        let mut camera = ctx.camera.camera.clone();
        let position = self.character_position();
        if let Some(position) = position {
            ctx.camera.follow.follow(&mut camera, position);
        }

        let ray = camera.ray_from_ndc(ctx.mouse.ndc, &ctx.projection);
        let pointing = self.hover(ray.as_ref()).is_some();
        if pointing != self.pointer_cursor {
            self.pointer_cursor = pointing;
            ctx.set_cursor(if pointing {
                CursorIcon::Pointer
            } else {
                CursorIcon::Default
            });
        }

        match position {
            Some(position) => Out::Configure(Box::new(move |ctx: &mut Context| {
                ctx.camera.follow.follow(&mut ctx.camera.camera, position);
            })),
            None => Out::Empty,
        }
    }

    fn on_window_events(
        &mut self,
        _: &Context,
        _: &mut (),
        event: &WindowEvent,
    ) -> Out {
        match event {
            // on the web keys come in through the page listener instead
            #[cfg(not(target_arch = "wasm32"))]
            WindowEvent::KeyboardInput {
                event:
                    winit::event::KeyEvent {
                        logical_key,
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => {
                if let Some(command) = Command::from_winit_key(logical_key) {
                    self.handle_command(command);
                }
            }
            WindowEvent::MouseInput {
                state: ElementState::Pressed,
                button: MouseButton::Left,
                ..
            } => {
                self.click();
            }
            _ => (),
        }
        Out::Empty
    }

    fn on_custom_events(
        &mut self,
        _: &Context,
        _: &mut (),
        event: PortfolioEvent,
    ) -> Option<PortfolioEvent> {
        self.handle_event(event);
        None
    }

    fn on_render(&self) -> Render<'_> {
        self.gpu.render(&self.graph)
    }
}
