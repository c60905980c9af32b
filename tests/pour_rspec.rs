//! Behavioural tests for pouring between two vessels using rust-rspec.
//!
//! A half-full jug tipped past its pour angle sits above a cup. Each scenario
//! steps the world once and checks what left the jug and what reached the
//! cup.

#[path = "support/rspec_runner.rs"]
mod rspec_runner;

use approx::assert_relative_eq;
use bevy::color::{LinearRgba, Mix};
use decant::physics::{flow_scale, liquid_step, mix_coefficient};
use decant::{LiquidCommand, TickReport};
use rspec::block::Context as Scenario;
use rspec_runner::run_serial;
use test_utils::fixtures::{jug_over_cup, CUP, JUG};
use test_utils::{assert_litres_close, LiquidScene};

const DT: f32 = 0.02;

#[derive(Debug, Clone)]
struct PourFixture {
    scene: LiquidScene,
    jug_before: f32,
    cup_before: f32,
    cup_color_before: LinearRgba,
    report: Option<TickReport>,
}

impl PourFixture {
    fn bootstrap() -> Self {
        let scene = LiquidScene::from_config(&jug_over_cup());
        Self {
            jug_before: scene.litres(JUG),
            cup_before: scene.litres(CUP),
            cup_color_before: scene.color(CUP),
            scene,
            report: None,
        }
    }

    fn command(&mut self, command: LiquidCommand) {
        assert!(command.apply(&mut self.scene.world), "vessel is registered");
        self.jug_before = self.scene.litres(JUG);
    }

    fn step(&mut self) {
        self.report = Some(self.scene.step(DT));
    }

    fn report(&self) -> &TickReport {
        self.report.as_ref().expect("the world has stepped")
    }

    /// Fill share the jug should lose in one tick from its starting state.
    fn expected_step(&self) -> f32 {
        let jug = self.scene.vessel(JUG);
        liquid_step(
            jug.split.radius_world(),
            jug.split.config().split_speed,
            DT,
            flow_scale(jug.container.pose().up()),
            self.jug_before / jug.container.volume(),
        )
    }

    fn jug_splitting(&self) -> bool {
        self.scene.vessel(JUG).split.is_splitting()
    }
}

#[test]
fn tipped_jug_pours_into_cup() {
    run_serial(&rspec::given(
        "a half-full jug tipped over a cup",
        PourFixture::bootstrap(),
        |scenario: &mut Scenario<PourFixture>| {
            scenario.before_each(|state| *state = PourFixture::bootstrap());

            scenario.when("the world steps once", |ctx| {
                ctx.before_each(PourFixture::step);

                ctx.then("the jug is splitting", |state| {
                    assert!(state.jug_splitting());
                });

                ctx.then("the jug loses exactly one liquid step", |state| {
                    let step = state.expected_step();
                    assert!(step > 0.0);
                    assert_relative_eq!(
                        state.scene.fill(JUG),
                        0.5 - step,
                        epsilon = 1e-6
                    );
                });

                ctx.then("the cup gains the litres the jug lost", |state| {
                    let lost = state.jug_before - state.scene.litres(JUG);
                    assert_litres_close(state.scene.litres(CUP) - state.cup_before, lost);
                    let transfer = state.report().transfers.first().expect("one transfer");
                    assert_eq!(transfer.source, JUG);
                    assert_eq!(transfer.destination, CUP);
                    assert_litres_close(transfer.litres, lost);
                    assert!(state.report().losses.is_empty());
                });

                ctx.then("the cup colour moves toward the jug colour", |state| {
                    let jug = state.scene.vessel(JUG);
                    let cup = state.scene.vessel(CUP);
                    let blend = mix_coefficient(
                        jug.split.config().split_speed,
                        cup.container.volume(),
                        jug.split.config().mixing_speed,
                    );
                    let expected = state
                        .cup_color_before
                        .mix(&jug.container.color(), blend);
                    let actual = cup.container.color();
                    assert_relative_eq!(actual.red, expected.red, epsilon = 1e-6);
                    assert_relative_eq!(actual.blue, expected.blue, epsilon = 1e-6);
                    assert_relative_eq!(actual.red, 0.1, epsilon = 1e-6);
                });

                ctx.then("a splash is raised at the rim", |state| {
                    let splash = state.report().splashes.first().expect("one splash");
                    assert_eq!(splash.source, JUG);
                    assert!(splash.position.y < 0.05);
                    assert!(splash.scale > 0.0);
                });
            });

            scenario.when("the jug is capped before stepping", |ctx| {
                ctx.before_each(|state| {
                    state.command(LiquidCommand::SetOpen {
                        vessel: JUG,
                        open: false,
                    });
                    state.step();
                });

                ctx.then("nothing pours", |state| {
                    assert!(!state.jug_splitting());
                    assert!(state.report().is_empty());
                    assert_litres_close(state.scene.litres(JUG), state.jug_before);
                    assert_litres_close(state.scene.litres(CUP), state.cup_before);
                });
            });

            scenario.when("the jug is emptied before stepping", |ctx| {
                ctx.before_each(|state| {
                    state.command(LiquidCommand::SetFillPercent {
                        vessel: JUG,
                        percent: 0.0,
                    });
                    state.step();
                });

                ctx.then("the overflow test short-circuits", |state| {
                    assert!(!state.jug_splitting());
                    assert!(state.report().splashes.is_empty());
                    assert_eq!(state.scene.fill(JUG), 0.0);
                    assert_litres_close(state.scene.litres(CUP), state.cup_before);
                });
            });

            scenario.when("the cup is already full", |ctx| {
                ctx.before_each(|state| {
                    state.command(LiquidCommand::SetFillPercent {
                        vessel: CUP,
                        percent: 1.0,
                    });
                    state.cup_before = state.scene.litres(CUP);
                    state.step();
                });

                ctx.then("the jug still pours", |state| {
                    assert!(state.jug_splitting());
                    assert_eq!(state.report().splashes.len(), 1);
                });

                ctx.then("the cup takes nothing and the excess is lost", |state| {
                    let poured = state.jug_before - state.scene.litres(JUG);
                    assert!(poured > 0.0);
                    assert_relative_eq!(state.scene.fill(CUP), 1.0);

                    let transfer = state.report().transfers.first().expect("one transfer");
                    assert_eq!(transfer.destination, CUP);
                    assert_eq!(transfer.litres, 0.0);
                    let loss = state.report().losses.first().expect("one loss");
                    assert_eq!(loss.source, JUG);
                    assert_litres_close(loss.litres, poured);
                });

                ctx.then("litres balance once the loss is counted", |state| {
                    let lost: f32 = state.report().losses.iter().map(|l| l.litres).sum();
                    assert_litres_close(
                        state.scene.litres(JUG) + state.scene.litres(CUP) + lost,
                        state.jug_before + state.cup_before,
                    );
                });
            });

            scenario.when("the jug is stood upright", |ctx| {
                ctx.before_each(|state| {
                    let mut upright = *state.scene.vessel(JUG).container.pose();
                    upright.rotation = glam::Quat::IDENTITY;
                    state.scene.world.set_pose(JUG, upright);
                    state.step();
                });

                ctx.then("the surface no longer reaches the opening", |state| {
                    assert!(!state.jug_splitting());
                    assert_relative_eq!(state.scene.fill(JUG), 0.5, epsilon = 1e-6);
                });
            });
        },
    ));
}
