// SPDX-FileCopyrightText: 2025 Jens Pitkänen <jens.pitkanen@helsinki.fi>
//
// SPDX-License-Identifier: GPL-3.0-or-later

use std::{
    cell::{Cell, RefCell},
    collections::HashSet,
};

use platform::{
    AudioBufferDesc, AudioBufferRef, BufferRef, GfxBufferDesc, GfxShaderDesc, GfxTextureDesc,
    Platform, ShaderRef, ShaderUniform, TextureRef,
};

/// A [`Platform`] which doesn't create anything, but keeps track of which
/// resources are alive, to check that everything created gets destroyed
/// exactly once.
#[derive(Default)]
pub struct TestPlatform {
    next_resource: Cell<u64>,
    live: RefCell<HashSet<u64>>,
    destroyed: Cell<usize>,
    /// Returned from every [`Platform::shader_uniforms`] call.
    pub uniforms: RefCell<Vec<ShaderUniform>>,
    /// If set, every create function returns None.
    pub fail_creation: Cell<bool>,
}

impl TestPlatform {
    pub fn live_count(&self) -> usize {
        self.live.borrow().len()
    }

    pub fn destroyed_count(&self) -> usize {
        self.destroyed.get()
    }

    pub fn is_live(&self, resource: u64) -> bool {
        self.live.borrow().contains(&resource)
    }

    fn create(&self) -> Option<u64> {
        if self.fail_creation.get() {
            return None;
        }
        let resource = self.next_resource.get();
        self.next_resource.set(resource + 1);
        self.live.borrow_mut().insert(resource);
        Some(resource)
    }

    fn destroy(&self, resource: u64) {
        assert!(
            self.live.borrow_mut().remove(&resource),
            "resource {resource} was destroyed twice, or was never created",
        );
        self.destroyed.set(self.destroyed.get() + 1);
    }
}

impl Platform for TestPlatform {
    fn create_buffer(&self, _desc: &GfxBufferDesc) -> Option<BufferRef> {
        self.create().map(BufferRef::new)
    }

    fn destroy_buffer(&self, buffer: BufferRef) {
        self.destroy(buffer.inner());
    }

    fn create_texture(&self, desc: &GfxTextureDesc) -> Option<TextureRef> {
        assert_eq!(desc.pixel_data_size(), desc.pixels.len());
        self.create().map(TextureRef::new)
    }

    fn destroy_texture(&self, texture: TextureRef) {
        self.destroy(texture.inner());
    }

    fn create_shader(&self, _desc: &GfxShaderDesc) -> Option<ShaderRef> {
        self.create().map(ShaderRef::new)
    }

    fn destroy_shader(&self, shader: ShaderRef) {
        self.destroy(shader.inner());
    }

    fn shader_uniforms(&self, shader: ShaderRef) -> Vec<ShaderUniform> {
        assert!(self.is_live(shader.inner()));
        self.uniforms.borrow().clone()
    }

    fn create_audio_buffer(&self, _desc: &AudioBufferDesc) -> Option<AudioBufferRef> {
        self.create().map(AudioBufferRef::new)
    }

    fn destroy_audio_buffer(&self, buffer: AudioBufferRef) {
        self.destroy(buffer.inner());
    }
}
