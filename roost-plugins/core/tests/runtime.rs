// Copyright 2025 Roost Contributors (https://github.com/roost-wm/roost)
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! End-to-end runtime tests driving real WASM modules (written as WAT text,
//! which the engine accepts directly) through load, subscribe, dispatch,
//! fault, and unload.

use std::sync::{mpsc, Arc, Mutex};

use roost_core::event::Event;
use roost_core::key::{Key, Keycode, ModMask};
use roost_core::window::WindowId;
use roost_plugins::shell::{LogSink, WindowOpError, WindowOps};
use roost_plugins::{Phase, PluginError, PluginId, PluginManager, Runner, RuntimeConfig};

/// Records every command and diagnostic the runtime relays.
#[derive(Default)]
struct Recorder {
    logs: Mutex<Vec<(String, String)>>,
    commands: Mutex<Vec<Command>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Move(u32, i32, i32),
    Resize(u32, u32, u32),
    Focus(u32),
    Close(u32),
}

impl Recorder {
    fn logs(&self) -> Vec<(String, String)> {
        self.logs.lock().unwrap().clone()
    }

    fn messages(&self) -> Vec<String> {
        self.logs().into_iter().map(|(_, msg)| msg).collect()
    }

    fn commands(&self) -> Vec<Command> {
        self.commands.lock().unwrap().clone()
    }
}

impl WindowOps for Recorder {
    fn move_window(&self, window: WindowId, x: i32, y: i32) -> Result<(), WindowOpError> {
        self.commands.lock().unwrap().push(Command::Move(window.0, x, y));
        Ok(())
    }

    fn resize_window(
        &self,
        window: WindowId,
        width: u32,
        height: u32,
    ) -> Result<(), WindowOpError> {
        self.commands
            .lock()
            .unwrap()
            .push(Command::Resize(window.0, width, height));
        Ok(())
    }

    fn focus_window(&self, window: WindowId) -> Result<(), WindowOpError> {
        self.commands.lock().unwrap().push(Command::Focus(window.0));
        Ok(())
    }

    fn close_window(&self, window: WindowId) -> Result<(), WindowOpError> {
        self.commands.lock().unwrap().push(Command::Close(window.0));
        Ok(())
    }
}

impl LogSink for Recorder {
    fn debug_log(&self, plugin: &PluginId, message: &str) {
        self.logs
            .lock()
            .unwrap()
            .push((plugin.to_string(), message.to_string()));
    }
}

fn test_config() -> RuntimeConfig {
    RuntimeConfig {
        max_fuel: 1_000_000,
        ..RuntimeConfig::default()
    }
}

fn manager_with(config: RuntimeConfig) -> (PluginManager, Arc<Recorder>) {
    let recorder = Arc::new(Recorder::default());
    let manager = PluginManager::with_log_sink(
        config,
        Arc::clone(&recorder) as Arc<dyn WindowOps>,
        Arc::clone(&recorder) as Arc<dyn LogSink>,
    )
    .unwrap();
    (manager, recorder)
}

fn key_press(modifiers: u16, keycode: u8) -> Event {
    Event::KeyPress(Key::new(ModMask::from(modifiers), Keycode::from(keycode)))
}

fn key_release(modifiers: u16, keycode: u8) -> Event {
    Event::KeyRelease(Key::new(ModMask::from(modifiers), Keycode::from(keycode)))
}

/// Subscribes to KeyPress filtered on Win+A (modifiers=64, keycode=38); on
/// handle, reads the staged event, logs, and moves window 2.
const WIN_A_PLUGIN: &str = r#"
(module
  (import "env" "subscribe" (func $subscribe (param i32 i32) (result i32)))
  (import "env" "event_len" (func $event_len (result i32)))
  (import "env" "event_read" (func $event_read (param i32 i32 i32) (result i32)))
  (import "env" "debug_log" (func $debug_log (param i32 i32) (result i32)))
  (import "env" "move_window" (func $move_window (param i32 i32 i32) (result i32)))
  (memory (export "memory") 1)
  (data (i32.const 0) "\01\00\00\00\40\00\26")
  (data (i32.const 32) "Win+A pressed")
  (func (export "init")
    (drop (call $subscribe (i32.const 0) (i32.const 7))))
  (func (export "handle")
    (drop (call $event_read (i32.const 64) (call $event_len) (i32.const 0)))
    (drop (call $debug_log (i32.const 32) (i32.const 13)))
    (drop (call $move_window (i32.const 2) (i32.const 300) (i32.const 400))))
)
"#;

/// Wildcard KeyPress subscriber that logs `message` on every delivery.
fn logger_plugin(message: &str) -> String {
    format!(
        r#"
(module
  (import "env" "subscribe" (func $subscribe (param i32 i32) (result i32)))
  (import "env" "debug_log" (func $debug_log (param i32 i32) (result i32)))
  (memory (export "memory") 1)
  (data (i32.const 0) "\01\00\00\00")
  (data (i32.const 16) "{message}")
  (func (export "init")
    (drop (call $subscribe (i32.const 0) (i32.const 4))))
  (func (export "handle")
    (drop (call $debug_log (i32.const 16) (i32.const {len}))))
)
"#,
        message = message,
        len = message.len()
    )
}

/// Wildcard KeyPress subscriber whose handle traps immediately.
const TRAP_PLUGIN: &str = r#"
(module
  (import "env" "subscribe" (func $subscribe (param i32 i32) (result i32)))
  (memory (export "memory") 1)
  (data (i32.const 0) "\01\00\00\00")
  (func (export "init")
    (drop (call $subscribe (i32.const 0) (i32.const 4))))
  (func (export "handle")
    unreachable)
)
"#;

/// Wildcard KeyPress subscriber whose handle never returns.
const SPIN_PLUGIN: &str = r#"
(module
  (import "env" "subscribe" (func $subscribe (param i32 i32) (result i32)))
  (memory (export "memory") 1)
  (data (i32.const 0) "\01\00\00\00")
  (func (export "init")
    (drop (call $subscribe (i32.const 0) (i32.const 4))))
  (func (export "handle")
    (loop $spin
      (br $spin)))
)
"#;

/// Wildcard KeyPress subscriber whose handle reads far outside its own
/// memory.
const OOB_PLUGIN: &str = r#"
(module
  (import "env" "subscribe" (func $subscribe (param i32 i32) (result i32)))
  (memory (export "memory") 1)
  (data (i32.const 0) "\01\00\00\00")
  (func (export "init")
    (drop (call $subscribe (i32.const 0) (i32.const 4))))
  (func (export "handle")
    (drop (i32.load (i32.const 1000000000))))
)
"#;

/// Subscribes, then traps before init completes.
const INIT_TRAP_PLUGIN: &str = r#"
(module
  (import "env" "subscribe" (func $subscribe (param i32 i32) (result i32)))
  (memory (export "memory") 1)
  (data (i32.const 0) "\01\00\00\00")
  (func (export "init")
    (drop (call $subscribe (i32.const 0) (i32.const 4)))
    unreachable)
  (func (export "handle"))
)
"#;

/// Logs once, then drops its own subscription from inside handle.
const ONE_SHOT_PLUGIN: &str = r#"
(module
  (import "env" "subscribe" (func $subscribe (param i32 i32) (result i32)))
  (import "env" "unsubscribe" (func $unsubscribe (param i32 i32) (result i32)))
  (import "env" "debug_log" (func $debug_log (param i32 i32) (result i32)))
  (memory (export "memory") 1)
  (data (i32.const 0) "\01\00\00\00")
  (data (i32.const 16) "tick")
  (func (export "init")
    (drop (call $subscribe (i32.const 0) (i32.const 4))))
  (func (export "handle")
    (drop (call $debug_log (i32.const 16) (i32.const 4)))
    (drop (call $unsubscribe (i32.const 0) (i32.const 4))))
)
"#;

/// Registers the same filtered subscription twice.
const DOUBLE_SUBSCRIBE_PLUGIN: &str = r#"
(module
  (import "env" "subscribe" (func $subscribe (param i32 i32) (result i32)))
  (import "env" "debug_log" (func $debug_log (param i32 i32) (result i32)))
  (memory (export "memory") 1)
  (data (i32.const 0) "\01\00\00\00\40\00\26")
  (data (i32.const 16) "once")
  (func (export "init")
    (drop (call $subscribe (i32.const 0) (i32.const 7)))
    (drop (call $subscribe (i32.const 0) (i32.const 7))))
  (func (export "handle")
    (drop (call $debug_log (i32.const 16) (i32.const 4))))
)
"#;

const NO_HANDLE_PLUGIN: &str = r#"
(module
  (memory (export "memory") 1)
  (func (export "init"))
)
"#;

#[test]
fn win_a_end_to_end() {
    let (mut manager, recorder) = manager_with(test_config());
    manager
        .load_from_bytes("hotkeys", WIN_A_PLUGIN.as_bytes())
        .unwrap();

    let outcome = manager.dispatch(&key_press(64, 38));
    assert_eq!(outcome.delivered, vec![PluginId::from("hotkeys")]);
    assert!(outcome.all_delivered());
    assert_eq!(
        recorder.logs(),
        vec![("hotkeys".to_string(), "Win+A pressed".to_string())]
    );
    assert_eq!(recorder.commands(), vec![Command::Move(2, 300, 400)]);

    // A different chord must not reach the plugin.
    let outcome = manager.dispatch(&key_press(0, 65));
    assert_eq!(outcome.delivery_count(), 0);
    assert_eq!(recorder.logs().len(), 1);
    assert_eq!(recorder.commands().len(), 1);
}

#[test]
fn wildcard_receives_every_press_but_no_release() {
    let (mut manager, recorder) = manager_with(test_config());
    manager
        .load_from_bytes("watcher", logger_plugin("press").as_bytes())
        .unwrap();

    manager.dispatch(&key_press(64, 38));
    manager.dispatch(&key_press(0, 24));
    manager.dispatch(&key_release(64, 38));

    assert_eq!(recorder.messages(), vec!["press", "press"]);
}

#[test]
fn delivery_follows_registration_order() {
    let (mut manager, recorder) = manager_with(test_config());
    for name in ["a", "b", "c"] {
        manager
            .load_from_bytes(name, logger_plugin(name).as_bytes())
            .unwrap();
    }

    manager.dispatch(&key_press(0, 10));
    manager.dispatch(&key_press(0, 10));

    assert_eq!(recorder.messages(), vec!["a", "b", "c", "a", "b", "c"]);
}

#[test]
fn handle_fault_does_not_block_other_modules() {
    let (mut manager, recorder) = manager_with(test_config());
    manager
        .load_from_bytes("bad", TRAP_PLUGIN.as_bytes())
        .unwrap();
    manager
        .load_from_bytes("good", logger_plugin("alive").as_bytes())
        .unwrap();

    let outcome = manager.dispatch(&key_press(0, 10));

    assert_eq!(outcome.delivered, vec![PluginId::from("good")]);
    assert_eq!(outcome.faults.len(), 1);
    let (faulted, error) = &outcome.faults[0];
    assert_eq!(*faulted, PluginId::from("bad"));
    assert!(matches!(
        error,
        PluginError::ModuleFault {
            phase: Phase::Handle,
            ..
        }
    ));
    assert_eq!(recorder.messages(), vec!["alive"]);

    // One fault is below the threshold; the module stays loaded.
    assert!(manager.is_loaded(&"bad".into()));
}

#[test]
fn out_of_bounds_access_traps_without_corrupting_dispatch() {
    let (mut manager, recorder) = manager_with(test_config());
    manager
        .load_from_bytes("oob", OOB_PLUGIN.as_bytes())
        .unwrap();
    manager
        .load_from_bytes("good", logger_plugin("unharmed").as_bytes())
        .unwrap();

    let outcome = manager.dispatch(&key_press(0, 10));

    assert_eq!(outcome.faults.len(), 1);
    assert_eq!(outcome.faults[0].0, PluginId::from("oob"));
    assert_eq!(outcome.delivered, vec![PluginId::from("good")]);
    assert_eq!(recorder.messages(), vec!["unharmed"]);
}

#[test]
fn runaway_module_exhausts_budget_and_is_unloaded_at_threshold() {
    let config = RuntimeConfig {
        max_fuel: 100_000,
        fault_threshold: 2,
        ..RuntimeConfig::default()
    };
    let (mut manager, recorder) = manager_with(config);
    manager
        .load_from_bytes("spin", SPIN_PLUGIN.as_bytes())
        .unwrap();
    manager
        .load_from_bytes("good", logger_plugin("still here").as_bytes())
        .unwrap();

    let outcome = manager.dispatch(&key_press(0, 10));
    assert_eq!(outcome.faults.len(), 1);
    match &outcome.faults[0].1 {
        PluginError::ModuleFault { reason, .. } => {
            assert!(reason.contains("budget"), "unexpected reason: {reason}");
        }
        other => panic!("expected a module fault, got {other}"),
    }
    assert!(outcome.unloaded.is_empty());
    assert!(manager.is_loaded(&"spin".into()));

    // Second consecutive fault reaches the threshold.
    let outcome = manager.dispatch(&key_press(0, 10));
    assert_eq!(outcome.unloaded, vec![PluginId::from("spin")]);
    assert!(!manager.is_loaded(&"spin".into()));
    assert_eq!(manager.subscription_count(), 1);

    // The healthy module was delivered to throughout and still is.
    let outcome = manager.dispatch(&key_press(0, 10));
    assert_eq!(outcome.delivered, vec![PluginId::from("good")]);
    assert!(outcome.all_delivered());
    assert_eq!(recorder.messages().len(), 3);
}

#[test]
fn init_fault_discards_the_module_and_its_subscriptions() {
    let (mut manager, _recorder) = manager_with(test_config());

    let err = manager
        .load_from_bytes("broken", INIT_TRAP_PLUGIN.as_bytes())
        .unwrap_err();
    assert!(matches!(
        err,
        PluginError::ModuleFault {
            phase: Phase::Init,
            ..
        }
    ));
    assert_eq!(manager.module_count(), 0);
    assert_eq!(manager.subscription_count(), 0);

    // Other modules load and receive events as if nothing happened.
    manager
        .load_from_bytes("good", logger_plugin("fine").as_bytes())
        .unwrap();
    let outcome = manager.dispatch(&key_press(0, 10));
    assert_eq!(outcome.delivery_count(), 1);
}

#[test]
fn duplicate_module_id_is_rejected() {
    let (mut manager, _recorder) = manager_with(test_config());
    manager
        .load_from_bytes("dup", logger_plugin("x").as_bytes())
        .unwrap();

    let err = manager
        .load_from_bytes("dup", logger_plugin("y").as_bytes())
        .unwrap_err();
    assert!(matches!(err, PluginError::DuplicateModuleId(id) if id == "dup".into()));
    assert_eq!(manager.module_count(), 1);
}

#[test]
fn module_without_handle_export_is_rejected() {
    let (mut manager, _recorder) = manager_with(test_config());

    let err = manager
        .load_from_bytes("stub", NO_HANDLE_PLUGIN.as_bytes())
        .unwrap_err();
    assert!(matches!(
        err,
        PluginError::MissingExport {
            export: "handle",
            ..
        }
    ));
}

#[test]
fn unload_prunes_subscriptions_for_good() {
    let (mut manager, recorder) = manager_with(test_config());
    manager
        .load_from_bytes("first", logger_plugin("first").as_bytes())
        .unwrap();

    manager.dispatch(&key_press(0, 10));
    manager.unload(&"first".into()).unwrap();
    assert_eq!(manager.subscription_count(), 0);

    manager.dispatch(&key_press(0, 10));
    assert_eq!(recorder.messages(), vec!["first"]);

    // A different module re-subscribing the same interest is delivered to,
    // the unloaded one never again.
    manager
        .load_from_bytes("second", logger_plugin("second").as_bytes())
        .unwrap();
    let outcome = manager.dispatch(&key_press(0, 10));
    assert_eq!(outcome.delivered, vec![PluginId::from("second")]);
    assert_eq!(recorder.messages(), vec!["first", "second"]);
}

#[test]
fn module_can_unsubscribe_itself() {
    let (mut manager, recorder) = manager_with(test_config());
    manager
        .load_from_bytes("oneshot", ONE_SHOT_PLUGIN.as_bytes())
        .unwrap();

    manager.dispatch(&key_press(0, 10));
    manager.dispatch(&key_press(0, 10));

    assert_eq!(recorder.messages(), vec!["tick"]);
    assert_eq!(manager.subscription_count(), 0);
    assert!(manager.is_loaded(&"oneshot".into()));
}

#[test]
fn duplicate_subscription_delivers_once() {
    let (mut manager, recorder) = manager_with(test_config());
    manager
        .load_from_bytes("eager", DOUBLE_SUBSCRIBE_PLUGIN.as_bytes())
        .unwrap();

    assert_eq!(manager.subscription_count(), 1);
    manager.dispatch(&key_press(64, 38));
    assert_eq!(recorder.messages(), vec!["once"]);
}

#[test]
fn handle_metrics_are_tracked() {
    let (mut manager, _recorder) = manager_with(test_config());
    manager
        .load_from_bytes("counted", logger_plugin("n").as_bytes())
        .unwrap();

    manager.dispatch(&key_press(0, 10));
    manager.dispatch(&key_press(0, 11));

    let metrics = manager.module_metrics(&"counted".into()).unwrap();
    assert_eq!(metrics.handle_count, 2);
    assert_eq!(metrics.fault_count, 0);
    assert!(metrics.host_call_count >= 3); // one subscribe + two debug_logs
}

#[test]
fn plugin_dir_scan_loads_artifacts_in_name_order() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("alpha.wasm"), logger_plugin("alpha")).unwrap();
    std::fs::write(dir.path().join("beta.wasm"), logger_plugin("beta")).unwrap();
    std::fs::write(dir.path().join("notes.txt"), "not a plugin").unwrap();

    let config = RuntimeConfig {
        plugin_dir: dir.path().to_path_buf(),
        ..test_config()
    };
    let (mut manager, recorder) = manager_with(config);

    let loaded = manager.load_plugin_dir().unwrap();
    assert_eq!(loaded, vec![PluginId::from("alpha"), PluginId::from("beta")]);
    assert_eq!(manager.module_count(), 2);

    manager.dispatch(&key_press(0, 10));
    assert_eq!(recorder.messages(), vec!["alpha", "beta"]);
}

#[test]
fn missing_plugin_dir_is_not_an_error() {
    let config = RuntimeConfig {
        plugin_dir: std::path::PathBuf::from("/nonexistent/roost-plugins"),
        ..test_config()
    };
    let (mut manager, _recorder) = manager_with(config);

    assert_eq!(manager.load_plugin_dir().unwrap(), Vec::<PluginId>::new());
    assert_eq!(manager.module_count(), 0);
}

#[test]
fn runner_drains_the_input_channel() {
    let (mut manager, recorder) = manager_with(test_config());
    manager
        .load_from_bytes("sink", logger_plugin("event").as_bytes())
        .unwrap();

    let (tx, rx) = mpsc::channel();
    tx.send(key_press(0, 10)).unwrap();
    tx.send(key_press(64, 38)).unwrap();
    tx.send(key_release(0, 10)).unwrap();
    drop(tx);

    let mut runner = Runner::new(manager, rx);
    runner.run();

    assert_eq!(recorder.messages(), vec!["event", "event"]);
    assert_eq!(runner.manager().module_count(), 1);
}
