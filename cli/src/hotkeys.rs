use crate::accelerator::combo_to_hotkey;
use crate::message::HostMessage;
use droptty_core::config::InputCombo;
use droptty_core::platform::PlatformResult;
use droptty_core::HotkeyAction;
use global_hotkey::hotkey::HotKey;
use global_hotkey::{GlobalHotKeyEvent, GlobalHotKeyManager, HotKeyState};
use log::trace;
use std::collections::HashMap;
use std::sync::Mutex;
use winit::event_loop::EventLoopProxy;

/// The process-wide hotkey table. Presses arrive on the event loop as `HostMessage::Hotkey`.
pub struct HotkeyRegistry {
    manager: GlobalHotKeyManager,
    registered: HashMap<u32, (HotKey, HotkeyAction)>,
}

impl HotkeyRegistry {
    pub fn new(proxy: EventLoopProxy<HostMessage>) -> Result<Self, global_hotkey::Error> {
        let manager = GlobalHotKeyManager::new()?;

        let proxy = Mutex::new(proxy);
        GlobalHotKeyEvent::set_event_handler(Some(move |event: GlobalHotKeyEvent| {
            if event.state != HotKeyState::Pressed {
                return;
            }
            if let Ok(proxy) = proxy.lock() {
                let _ = proxy.send_event(HostMessage::Hotkey(event.id));
            }
        }));

        Ok(Self {
            manager,
            registered: HashMap::new(),
        })
    }

    pub fn register(&mut self, combo: &InputCombo, action: HotkeyAction) -> PlatformResult<()> {
        let hotkey =
            combo_to_hotkey(combo).ok_or_else(|| format!("{combo} cannot be used globally"))?;

        if self.registered.contains_key(&hotkey.id()) {
            return Err(format!("{combo} is already registered").into());
        }

        self.manager
            .register(hotkey)
            .map_err(|e| format!("Failed to register {combo}: {e}"))?;
        self.registered.insert(hotkey.id(), (hotkey, action));

        trace!("Registered hotkey {combo} for {action:?}");
        Ok(())
    }

    pub fn unregister_all(&mut self) -> PlatformResult<()> {
        let hotkeys: Vec<HotKey> = self
            .registered
            .drain()
            .map(|(_, (hotkey, _))| hotkey)
            .collect();

        if !hotkeys.is_empty() {
            self.manager
                .unregister_all(&hotkeys)
                .map_err(|e| format!("Failed to unregister hotkeys: {e}"))?;
        }
        Ok(())
    }

    pub fn action(&self, id: u32) -> Option<HotkeyAction> {
        self.registered.get(&id).map(|(_, action)| *action)
    }
}
