//! Helpers shared by integration tests.

#![allow(dead_code)]

pub mod socket_guard;

/// A small element page in the wiki's layout.
///
/// Icon sources point at `icon_base`, which the tests serve with wiremock.
/// Lava and Mud have no image; Time is listed under Special elements.
pub fn element_page(icon_base: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html><body>
<h2><span class="mw-headline">Elements</span></h2>
<h3><span class="mw-headline">Starting elements</span></h3>
<table class="list-table">
  <tr><th>Element</th><th>Recipes</th></tr>
  <tr>
    <td><a href="/wiki/Water" class="image"><img src="data:image/gif;base64,R0lGOD" data-src="{icon_base}/images/Water.svg/revision/latest/scale-to-width-down/40?cb=1"></a>
        <a href="/wiki/Water" title="Water">Water</a></td>
    <td>Available from the start.</td>
  </tr>
  <tr>
    <td><a href="/wiki/Fire" class="image"><img src="{icon_base}/images/Fire.svg/revision/20190101/scale-to-width-down/40"></a>
        <a href="/wiki/Fire" title="Fire">Fire</a></td>
    <td>Available from the start.</td>
  </tr>
  <tr>
    <td><a href="/wiki/Earth" class="image"><img src="{icon_base}/images/Earth.svg/revision/latest"></a>
        <a href="/wiki/Earth" title="Earth">Earth</a></td>
    <td>Available from the start.</td>
  </tr>
</table>
<h3><span class="mw-headline">Special elements</span></h3>
<table class="list-table">
  <tr><td><a href="/wiki/Time" title="Time">Time</a></td><td>Unlocked after 100 elements.</td></tr>
</table>
<h3><span class="mw-headline">Tier 1 elements</span></h3>
<table class="list-table">
  <tr>
    <td><a href="/wiki/Lava" title="Lava">Lava</a></td>
    <td><ul>
      <li><a href="/wiki/Earth" title="Earth">Earth</a> + <a href="/wiki/Fire" title="Fire">Fire</a></li>
    </ul></td>
  </tr>
  <tr>
    <td><a href="/wiki/Mud" title="Mud">Mud</a></td>
    <td><ul>
      <li><a href="/wiki/Water" title="Water">Water</a> + <a href="/wiki/Earth" title="Earth">Earth</a></li>
      <li>See also the Swamp article</li>
    </ul></td>
  </tr>
</table>
<h3><span class="mw-headline">Tier 2 elements</span></h3>
<table class="list-table">
  <tr>
    <td><a href="/wiki/Stone" title="Stone">Stone</a></td>
    <td><ul>
      <li><a href="/wiki/Lava" title="Lava">Lava</a> + <a href="/wiki/Water" title="Water">Water</a></li>
      <li><a href="/wiki/Lava" title="Lava">Lava</a> + <a href="/wiki/Air" title="Air">Air</a></li>
    </ul></td>
  </tr>
</table>
</body></html>
"#
    )
}
